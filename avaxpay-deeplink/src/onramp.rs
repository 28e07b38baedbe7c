//! Fiat on-ramp (MoonPay) integration, demo mode
//!
//! Amounts are validated against a per-currency USD band before a session is
//! requested. The demo provider never calls out; it builds the widget URL
//! locally and fabricates a transaction id.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{address::is_valid_address, Error, Result};

/// Minimum on-ramp purchase in USD
pub const MIN_PURCHASE_USD: f64 = 30.0;

/// Maximum on-ramp purchase in USD
pub const MAX_PURCHASE_USD: f64 = 20_000.0;

/// On-ramp provider fee, in percent
pub const ONRAMP_FEE_PERCENT: f64 = 4.5;

/// Demo API key used until real credentials are configured
pub const DEMO_API_KEY: &str = "demo_api_key_replace_after_grant";

/// A currency that can be bought through the on-ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCurrency {
    pub code: String,
    pub name: String,
    pub min_amount: f64,
    pub max_amount: f64,
}

/// On-ramp configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRampConfig {
    pub api_key: String,
    pub widget_url: String,
    pub api_url: String,
    pub supported_currencies: Vec<SupportedCurrency>,
    pub fee_percentage: f64,
    pub fixed_fee: f64,
    pub demo_mode: bool,
}

impl Default for OnRampConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            widget_url: "https://buy.moonpay.com".to_string(),
            api_url: "https://api.moonpay.com/v3".to_string(),
            supported_currencies: vec![
                SupportedCurrency {
                    code: "usdc_avalanche".to_string(),
                    name: "USDC on Avalanche".to_string(),
                    min_amount: MIN_PURCHASE_USD,
                    max_amount: MAX_PURCHASE_USD,
                },
                SupportedCurrency {
                    code: "avax".to_string(),
                    name: "AVAX".to_string(),
                    min_amount: MIN_PURCHASE_USD,
                    max_amount: MAX_PURCHASE_USD,
                },
            ],
            fee_percentage: ONRAMP_FEE_PERCENT,
            fixed_fee: 0.0,
            demo_mode: true,
        }
    }
}

/// Purchase cost including provider fees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub amount: f64,
    pub fee: f64,
    pub total: f64,
}

/// Request to start an on-ramp purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRampRequest {
    pub wallet_address: String,
    pub currency_code: String,
    /// Fiat amount in USD
    pub base_currency_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_transaction_id: Option<String>,
}

/// A started on-ramp purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRampSession {
    pub transaction_id: String,
    pub widget_url: String,
    pub demo_mode: bool,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl OnRampConfig {
    pub fn currency(&self, code: &str) -> Option<&SupportedCurrency> {
        self.supported_currencies.iter().find(|c| c.code == code)
    }

    /// Check a USD amount against the currency's band (inclusive).
    pub fn validate_amount(&self, amount: f64, currency_code: &str) -> Result<()> {
        let currency = self
            .currency(currency_code)
            .ok_or_else(|| Error::UnsupportedCurrency(currency_code.to_string()))?;
        if !amount.is_finite() || amount < currency.min_amount || amount > currency.max_amount {
            return Err(Error::AmountOutOfRange {
                min: currency.min_amount,
                max: currency.max_amount,
            });
        }
        Ok(())
    }

    pub fn is_valid_amount(&self, amount: f64, currency_code: &str) -> bool {
        self.validate_amount(amount, currency_code).is_ok()
    }

    /// Total cost of buying `amount` USD worth, fees rounded to cents.
    pub fn quote(&self, amount: f64) -> FeeQuote {
        let fee = amount * (self.fee_percentage / 100.0) + self.fixed_fee;
        FeeQuote {
            amount,
            fee: round_cents(fee),
            total: round_cents(amount + fee),
        }
    }

    /// Hosted widget URL for a purchase.
    pub fn widget_url(&self, request: &OnRampRequest) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("apiKey", &self.api_key);
        query.append_pair("currencyCode", &request.currency_code);
        query.append_pair("walletAddress", &request.wallet_address);
        query.append_pair(
            "baseCurrencyAmount",
            &request.base_currency_amount.to_string(),
        );
        if let Some(id) = &request.external_transaction_id {
            query.append_pair("externalTransactionId", id);
        }
        format!("{}?{}", self.widget_url, query.finish())
    }

    /// Validate wallet address, currency and amount band.
    pub fn validate_request(&self, request: &OnRampRequest) -> Result<()> {
        if !is_valid_address(&request.wallet_address) {
            return Err(Error::InvalidAddress(request.wallet_address.clone()));
        }
        self.validate_amount(request.base_currency_amount, &request.currency_code)
    }
}

/// A fiat on-ramp provider
#[async_trait]
pub trait OnRampProvider: Send + Sync {
    /// Start a purchase and return the widget to send the buyer to.
    async fn create_transaction(&self, request: &OnRampRequest) -> Result<OnRampSession>;
}

/// Provider that simulates the on-ramp locally
#[derive(Debug, Clone, Default)]
pub struct DemoOnRamp {
    config: OnRampConfig,
}

impl DemoOnRamp {
    pub fn new(config: OnRampConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OnRampConfig {
        &self.config
    }
}

#[async_trait]
impl OnRampProvider for DemoOnRamp {
    async fn create_transaction(&self, request: &OnRampRequest) -> Result<OnRampSession> {
        self.config.validate_request(request)?;

        let session = OnRampSession {
            transaction_id: format!("demo_txn_{}", Utc::now().timestamp_millis()),
            widget_url: self.config.widget_url(request),
            demo_mode: true,
        };
        tracing::info!(
            transaction_id = %session.transaction_id,
            currency = %request.currency_code,
            amount = request.base_currency_amount,
            "created demo on-ramp transaction"
        );
        Ok(session)
    }
}

/// Status of an on-ramp transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnRampStatus {
    Pending,
    Completed,
    Failed,
}

/// Transaction as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRampTransaction {
    pub id: String,
    pub status: OnRampStatus,
    pub crypto_currency_id: String,
    pub base_currency_amount: f64,
    pub quote_currency_amount: f64,
    pub fee_amount: f64,
    pub wallet_address: String,
    pub created_at: String,
}

/// Raw webhook body: `{ "type": ..., "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Webhook notification
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    TransactionCompleted(OnRampTransaction),
    TransactionFailed(OnRampTransaction),
    /// Any other notification type; acknowledged and ignored
    Unknown(String),
}

impl WebhookPayload {
    pub fn event(&self) -> Result<WebhookEvent> {
        let transaction = || serde_json::from_value::<OnRampTransaction>(self.data.clone());
        let event = match self.kind.as_str() {
            "transaction_completed" => WebhookEvent::TransactionCompleted(transaction()?),
            "transaction_failed" => WebhookEvent::TransactionFailed(transaction()?),
            other => WebhookEvent::Unknown(other.to_string()),
        };
        Ok(event)
    }
}

impl WebhookEvent {
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::TransactionCompleted(tx) | WebhookEvent::TransactionFailed(tx) => {
                Some(&tx.id)
            }
            WebhookEvent::Unknown(_) => None,
        }
    }
}
