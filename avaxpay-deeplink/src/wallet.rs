//! Wallet / RPC collaborator boundary
//!
//! Signing, broadcasting and contract reads belong to the wallet layer. This
//! module only defines the shapes exchanged with it, plus [`PaymentSender`],
//! which turns a decoded [`PaymentRequest`] into exactly one submission.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    format::{
        calculate_mrr, format_amount, interval_text, is_payment_overdue_at,
        time_until_next_payment_at,
    },
    link::PaymentRequest,
    registry::{is_native_address, Registry},
    units::{parse_amount, NATIVE_DECIMALS},
    Error, Result,
};

/// Decimal places shown in subscription summaries
const SUMMARY_DECIMALS: usize = 2;

/// Label recorded on-chain when the link carries none
pub const DEFAULT_PAYMENT_LABEL: &str = "Payment";

/// A subscription as read from the subscription manager contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: u64,
    pub subscriber: String,
    pub recipient: String,
    /// Smallest units of `token` per period
    pub amount_per_period: u128,
    pub interval_seconds: u64,
    pub token: String,
    pub start_timestamp: i64,
    pub last_payment_timestamp: i64,
    pub next_payment_timestamp: i64,
    pub total_payments_made: u64,
    pub active: bool,
}

/// Connected wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub address: String,
    pub chain_id: u64,
}

/// Handle of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHandle(pub String);

impl TxHandle {
    pub fn hash(&self) -> &str {
        &self.0
    }
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wallet and RPC operations consumed by AvaxPay.
///
/// Implementations own retries, gas and nonce sequencing. Any `Err` they
/// return is surfaced to the caller as-is.
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn connect(&self) -> Result<WalletSession>;

    /// Pay through the `processor` contract in the native asset (`value` in wei).
    async fn submit_payment(
        &self,
        processor: &str,
        to: &str,
        label: &str,
        memo: &str,
        value: u128,
    ) -> Result<TxHandle>;

    /// Pay through the `processor` contract in an ERC-20 token (`amount` in
    /// smallest units).
    async fn submit_token_payment(
        &self,
        processor: &str,
        to: &str,
        token_address: &str,
        amount: u128,
        label: &str,
        memo: &str,
    ) -> Result<TxHandle>;

    async fn wait_for_confirmation(&self, tx: &TxHandle) -> Result<TxReceipt>;

    async fn read_subscription(&self, id: u64) -> Result<Subscription>;

    /// Recipient MRR as computed by the contract, in smallest units.
    async fn read_mrr(&self, recipient: &str) -> Result<u128>;
}

/// A confirmed payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub tx: TxHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

/// Submits decoded payment links through a [`WalletClient`]
pub struct PaymentSender<W> {
    wallet: W,
    registry: Arc<Registry>,
}

impl<W: WalletClient> PaymentSender<W> {
    pub fn new(wallet: W, registry: Arc<Registry>) -> Self {
        Self { wallet, registry }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Validate, submit once and wait for the receipt.
    ///
    /// A missing token means the native asset. Chains without a deployed
    /// processor are rejected before anything is submitted. Reverted
    /// transactions become [`Error::TransactionFailed`]; nothing is retried.
    pub async fn pay(&self, request: &PaymentRequest) -> Result<PaymentOutcome> {
        request.validate()?;

        let chain_id = request
            .chain_id
            .unwrap_or_else(|| self.registry.default_chain_id());
        let contracts = self.registry.contracts(chain_id)?;
        let processor = contracts.processor.as_str();
        if is_native_address(processor) {
            return Err(Error::ProcessorNotDeployed(chain_id));
        }

        let label = request
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_LABEL);
        let memo = request.memo.as_deref().unwrap_or_default();

        let tx = match request.token.as_deref() {
            None => {
                let value = parse_amount(&request.amount, NATIVE_DECIMALS)?;
                self.wallet
                    .submit_payment(processor, &request.to, label, memo, value)
                    .await
            }
            Some(token) if self.registry.is_native_token(token) => {
                let decimals = self
                    .registry
                    .native_token()
                    .map(|t| t.decimals)
                    .unwrap_or(NATIVE_DECIMALS);
                let value = parse_amount(&request.amount, decimals)?;
                self.wallet
                    .submit_payment(processor, &request.to, label, memo, value)
                    .await
            }
            Some(token) => {
                let info = self
                    .registry
                    .resolve_token(token)
                    .ok_or_else(|| Error::UnknownToken(token.to_string()))?;
                let amount = parse_amount(&request.amount, info.decimals)?;
                // Per-network deployment wins over the registry-wide address.
                let token_address = contracts
                    .tokens
                    .get(&info.symbol)
                    .unwrap_or(&info.address);
                self.wallet
                    .submit_token_payment(
                        processor,
                        &request.to,
                        token_address,
                        amount,
                        label,
                        memo,
                    )
                    .await
            }
        }
        .map_err(|e| {
            tracing::warn!(to = %request.to, error = %e, "payment submission failed");
            into_wallet_error(e)
        })?;

        tracing::info!(tx = %tx.hash(), chain_id, "payment submitted");

        let receipt = self
            .wallet
            .wait_for_confirmation(&tx)
            .await
            .map_err(into_wallet_error)?;
        if !receipt.success {
            let reason = receipt
                .error
                .unwrap_or_else(|| "transaction reverted".to_string());
            tracing::warn!(tx = %tx.hash(), %reason, "payment reverted");
            return Err(Error::TransactionFailed(reason));
        }

        let explorer_url = self.registry.explorer_tx_url(chain_id, tx.hash());
        Ok(PaymentOutcome { tx, explorer_url })
    }
}

/// Collapse collaborator failures into [`Error::Wallet`].
fn into_wallet_error(e: Error) -> Error {
    match e {
        Error::Wallet(_) | Error::TransactionFailed(_) => e,
        other => Error::Wallet(other.to_string()),
    }
}

/// Display values derived from a [`Subscription`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub amount: String,
    pub mrr: f64,
    pub interval: String,
    pub overdue: bool,
    pub next_payment: String,
    pub active: bool,
}

impl SubscriptionSummary {
    pub fn from_subscription(subscription: &Subscription, decimals: u8, now: i64) -> Self {
        Self {
            amount: format_amount(subscription.amount_per_period, decimals, SUMMARY_DECIMALS),
            mrr: calculate_mrr(
                subscription.amount_per_period,
                subscription.interval_seconds,
                decimals,
            ),
            interval: interval_text(subscription.interval_seconds),
            overdue: subscription.active
                && is_payment_overdue_at(subscription.next_payment_timestamp, now),
            next_payment: time_until_next_payment_at(subscription.next_payment_timestamp, now),
            active: subscription.active,
        }
    }
}
