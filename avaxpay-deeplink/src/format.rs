//! Display helpers for amounts, subscriptions and timestamps
//!
//! Everything here is pure. Helpers that compare against the clock have an
//! `_at` variant taking `now` explicitly.

use chrono::{DateTime, Utc};

use crate::units::{parse_positive_amount, units_to_f64};

/// Fixed 30-day month used to normalise billing intervals
pub const SECONDS_PER_MONTH: u64 = 2_592_000;

/// Seconds in one day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Processor fee in basis points (0.5%), shown to users only
pub const PROCESSOR_FEE_BPS: u32 = 50;

const BPS_DENOMINATOR: f64 = 10_000.0;

/// An amount in one of the shapes the dashboard receives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountValue<'a> {
    /// Human decimal string such as `"12.5"`
    Decimal(&'a str),
    /// Smallest-unit integer, scaled by the token decimals
    Units(u128),
    /// Already-scaled number
    Number(f64),
}

impl<'a> From<&'a str> for AmountValue<'a> {
    fn from(value: &'a str) -> Self {
        AmountValue::Decimal(value)
    }
}

impl From<u128> for AmountValue<'_> {
    fn from(value: u128) -> Self {
        AmountValue::Units(value)
    }
}

impl From<f64> for AmountValue<'_> {
    fn from(value: f64) -> Self {
        AmountValue::Number(value)
    }
}

/// Format an amount with `K`/`M` suffixes above one thousand / one million.
pub fn format_amount<'a>(
    amount: impl Into<AmountValue<'a>>,
    decimals: u8,
    max_decimals: usize,
) -> String {
    let value = match amount.into() {
        AmountValue::Decimal(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        AmountValue::Units(units) => units_to_f64(units, decimals),
        AmountValue::Number(n) => n,
    };

    if value >= 1_000_000.0 {
        format!("{:.*}M", max_decimals, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.*}K", max_decimals, value / 1_000.0)
    } else {
        format!("{:.*}", max_decimals, value)
    }
}

/// Format a fiat amount as `$x.xx`.
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Same as [`format_currency`] for a decimal string.
pub fn format_currency_str(amount: &str) -> String {
    format_currency(amount.trim().parse::<f64>().unwrap_or(f64::NAN))
}

/// Monthly recurring revenue for one subscription.
///
/// The interval is normalised to a fixed 30-day month
/// (`amount * SECONDS_PER_MONTH / interval`). This is an approximation and
/// not calendar-month accounting. A zero interval yields `0.0`.
pub fn calculate_mrr(amount_per_period: u128, interval_seconds: u64, decimals: u8) -> f64 {
    if interval_seconds == 0 {
        return 0.0;
    }
    let amount = units_to_f64(amount_per_period, decimals);
    amount * SECONDS_PER_MONTH as f64 / interval_seconds as f64
}

/// Human-readable billing interval.
pub fn interval_text(interval_seconds: u64) -> String {
    let days = interval_seconds / SECONDS_PER_DAY;
    match days {
        1 => "Daily".to_string(),
        7 => "Weekly".to_string(),
        30 => "Monthly".to_string(),
        365 => "Yearly".to_string(),
        n => format!("Every {} days", n),
    }
}

/// Whether a subscription payment is overdue right now.
pub fn is_payment_overdue(next_payment_timestamp: i64) -> bool {
    is_payment_overdue_at(next_payment_timestamp, Utc::now().timestamp())
}

/// Strictly `next < now`; a payment due exactly now is not overdue.
pub fn is_payment_overdue_at(next_payment_timestamp: i64, now: i64) -> bool {
    next_payment_timestamp < now
}

/// Time remaining until the next payment, e.g. `2d 3h`.
pub fn time_until_next_payment(next_payment_timestamp: i64) -> String {
    time_until_next_payment_at(next_payment_timestamp, Utc::now().timestamp())
}

pub fn time_until_next_payment_at(next_payment_timestamp: i64, now: i64) -> String {
    let diff = next_payment_timestamp - now;
    if diff <= 0 {
        return "Payment due".to_string();
    }

    let day = SECONDS_PER_DAY as i64;
    let days = diff / day;
    let hours = (diff % day) / 3600;
    let minutes = (diff % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a unix timestamp like `Jan 5, 2024, 03:07 PM` (rendered in UTC).
pub fn format_date(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Display-only split of an amount into processor fee and net.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBreakdown {
    pub amount: f64,
    pub fee: f64,
    pub net: f64,
}

pub fn fee_breakdown(amount: f64, fee_bps: u32) -> FeeBreakdown {
    let fee = amount * fee_bps as f64 / BPS_DENOMINATOR;
    FeeBreakdown {
        amount,
        fee,
        net: amount - fee,
    }
}

/// Fee breakdown for a decimal string, `None` if the amount is not positive.
pub fn fee_breakdown_str(amount: &str, fee_bps: u32) -> Option<FeeBreakdown> {
    parse_positive_amount(amount).map(|value| fee_breakdown(value, fee_bps))
}
