//! avaxpay-rails library
//!
//! Axum-based HTTP service for AvaxPay.
//!
//! # Features
//! - Payment and batch link encoding / decoding
//! - Demo fiat on-ramp (MoonPay) sessions and webhook intake
//! - Decoding of embedded pay-button payloads

use std::{env, fs, sync::Arc};

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use avaxpay_deeplink::{
    onramp::{
        DemoOnRamp, OnRampConfig, OnRampProvider, OnRampRequest, WebhookEvent, WebhookPayload,
    },
    widget::{widget_payment_from_json, WidgetPayment, DATA_PARAM, DEFAULT_APP_URL},
    BatchPaymentRequest, DeepLink, Error as LinkError, LinkCodec, PaymentRequest, Registry,
};

// Environment variables
const APP_URL_ENV: &str = "AVAXPAY_APP_URL";
const REGISTRY_PATH_ENV: &str = "AVAXPAY_REGISTRY_PATH";
const ONRAMP_API_KEY_ENV: &str = "AVAXPAY_ONRAMP_API_KEY";
const DEFAULT_CHAIN_ID_ENV: &str = "AVAXPAY_DEFAULT_CHAIN_ID";

const SERVICE_NAME: &str = "avaxpay-rails";
const DEMO_MESSAGE: &str = "Demo mode: Real Moonpay will be integrated after grant funding";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read registry file {path}: {source}")]
    RegistryFile {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid {var}: {value}")]
    InvalidVar { var: &'static str, value: String },

    #[error(transparent)]
    Registry(#[from] LinkError),
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Public base URL for web links and the pay page
    pub app_url: String,
    codec: LinkCodec,
    onramp: Arc<dyn OnRampProvider>,
}

impl AppState {
    pub fn new(registry: Registry, app_url: String, onramp: Arc<dyn OnRampProvider>) -> Self {
        Self {
            app_url,
            codec: LinkCodec::new(Arc::new(registry)),
            onramp,
        }
    }

    /// Build the state from `AVAXPAY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut registry = match env::var(REGISTRY_PATH_ENV) {
            Ok(path) => {
                let json = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::RegistryFile { path: path.clone(), source })?;
                tracing::info!(%path, "loaded registry file");
                Registry::from_json(&json)?
            }
            Err(_) => Registry::avalanche(),
        };

        if let Ok(value) = env::var(DEFAULT_CHAIN_ID_ENV) {
            let chain_id = value.parse().map_err(|_| ConfigError::InvalidVar {
                var: DEFAULT_CHAIN_ID_ENV,
                value: value.clone(),
            })?;
            registry = registry.with_default_chain_id(chain_id)?;
        }

        let app_url = env::var(APP_URL_ENV).unwrap_or_else(|_| DEFAULT_APP_URL.to_string());

        let mut onramp = OnRampConfig::default();
        if let Ok(api_key) = env::var(ONRAMP_API_KEY_ENV) {
            onramp.api_key = api_key;
        }

        Ok(Self::new(
            registry,
            app_url,
            Arc::new(DemoOnRamp::new(onramp)),
        ))
    }

    pub fn codec(&self) -> &LinkCodec {
        &self.codec
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Registry::avalanche(),
            DEFAULT_APP_URL.to_string(),
            Arc::new(DemoOnRamp::default()),
        )
    }
}

/// Build the router with built-in defaults.
pub fn app_router() -> Router {
    router(AppState::default())
}

/// Build the router around an explicit state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/links/encode", post(encode_link))
        .route("/links/encode-batch", post(encode_batch_link))
        .route("/links/decode", post(decode_link))
        .route("/api/moonpay/create-transaction", post(create_transaction))
        .route("/api/moonpay/webhook", post(moonpay_webhook))
        .route("/pay", get(pay))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Registry summary endpoint.
async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.codec.registry();
    let networks: Vec<_> = registry
        .chain_ids()
        .filter_map(|chain_id| registry.network(chain_id).ok())
        .map(|network| {
            serde_json::json!({
                "chainId": network.chain_id,
                "hexChainId": network.hex_chain_id(),
                "name": network.name,
            })
        })
        .collect();
    let tokens: Vec<_> = registry.tokens().iter().map(|t| t.symbol.as_str()).collect();

    Json(serde_json::json!({
        "defaultChainId": registry.default_chain_id(),
        "networks": networks,
        "tokens": tokens,
        "appUrl": state.app_url,
    }))
}

/// Encoded link pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeResponse {
    pub link: String,
    pub web_link: String,
}

async fn encode_link(
    State(state): State<AppState>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<EncodeResponse>, ApiError> {
    req.validate()?;
    Ok(Json(EncodeResponse {
        link: state.codec.encode_payment_link(&req),
        web_link: state.codec.encode_web_link(&state.app_url, &req),
    }))
}

async fn encode_batch_link(
    State(state): State<AppState>,
    Json(req): Json<BatchPaymentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let link = state.codec.encode_batch_payment_link(&req)?;
    Ok(Json(serde_json::json!({ "link": link })))
}

/// Decode request.
#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    pub link: String,
}

async fn decode_link(
    State(state): State<AppState>,
    Json(req): Json<DecodeRequest>,
) -> Result<Json<DeepLink>, ApiError> {
    state.codec.decode_link(&req.link).map(Json).map_err(|e| {
        tracing::debug!(error = %e, "rejected link");
        ApiError::bad_request("link invalid")
    })
}

/// Fiat amount as sent by clients: either a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FiatAmount {
    Number(f64),
    Text(String),
}

impl FiatAmount {
    fn value(&self) -> Option<f64> {
        match self {
            FiatAmount::Number(n) => Some(*n),
            FiatAmount::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// On-ramp transaction request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub wallet_address: Option<String>,
    pub amount: Option<FiatAmount>,
    pub currency_code: Option<String>,
    /// Our internal payment id, forwarded as the external transaction id
    pub payment_id: Option<String>,
}

/// On-ramp transaction response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionResponse {
    pub success: bool,
    pub transaction_id: String,
    pub widget_url: String,
    pub message: String,
    pub demo_mode: bool,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn create_transaction(
    State(state): State<AppState>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<Json<CreateTransactionResponse>, ApiError> {
    let (Some(wallet_address), Some(amount), Some(currency_code)) = (
        present(req.wallet_address),
        req.amount,
        present(req.currency_code),
    ) else {
        return Err(ApiError::bad_request("Missing required parameters"));
    };

    let request = OnRampRequest {
        wallet_address,
        currency_code,
        base_currency_amount: amount.value().unwrap_or(f64::NAN),
        external_transaction_id: present(req.payment_id),
    };

    let session = state.onramp.create_transaction(&request).await.map_err(|e| match e {
        LinkError::InvalidAddress(_) => ApiError::bad_request("Invalid wallet address"),
        LinkError::AmountOutOfRange { min, max } => {
            ApiError::bad_request(format!("Amount must be between ${} and ${}", min, max))
        }
        other => ApiError::from(other),
    })?;

    Ok(Json(CreateTransactionResponse {
        success: true,
        transaction_id: session.transaction_id,
        widget_url: session.widget_url,
        message: DEMO_MESSAGE.to_string(),
        demo_mode: session.demo_mode,
    }))
}

/// Accept any well-formed notification; the provider expects a 200.
async fn moonpay_webhook(body: String) -> Result<Json<serde_json::Value>, ApiError> {
    let payload: WebhookPayload = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "unreadable on-ramp webhook");
        ApiError::bad_request("Invalid webhook payload")
    })?;

    match payload.event() {
        Ok(WebhookEvent::TransactionCompleted(tx)) => {
            tracing::info!(id = %tx.id, wallet = %tx.wallet_address, "on-ramp transaction completed");
        }
        Ok(WebhookEvent::TransactionFailed(tx)) => {
            tracing::warn!(id = %tx.id, wallet = %tx.wallet_address, "on-ramp transaction failed");
        }
        Ok(WebhookEvent::Unknown(kind)) => {
            tracing::info!(%kind, "unknown on-ramp webhook type");
        }
        Err(e) => {
            tracing::warn!(kind = %payload.kind, error = %e, "malformed on-ramp webhook data");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// Pay-page query.
#[derive(Debug, Deserialize)]
pub struct PayQuery {
    pub data: Option<String>,
}

async fn pay(Query(query): Query<PayQuery>) -> Result<Json<WidgetPayment>, ApiError> {
    // `Query` has already percent-decoded the payload.
    let data = query
        .data
        .ok_or(LinkError::MissingParameter(DATA_PARAM))?;
    Ok(Json(widget_payment_from_json(&data)?))
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        let status = match &err {
            LinkError::Wallet(_) | LinkError::TransactionFailed(_) => StatusCode::BAD_GATEWAY,
            LinkError::InvalidRegistry(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health() {
        let server = TestServer::new(app_router()).unwrap();
        let response = server.get("/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_info() {
        let server = TestServer::new(app_router()).unwrap();
        let response = server.get("/info").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["defaultChainId"], 43113);
        assert_eq!(body["networks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_fiat_amount_forms() {
        let n: FiatAmount = serde_json::from_str("50").unwrap();
        let s: FiatAmount = serde_json::from_str("\" 75.5 \"").unwrap();
        let bad: FiatAmount = serde_json::from_str("\"lots\"").unwrap();
        assert_eq!(n.value(), Some(50.0));
        assert_eq!(s.value(), Some(75.5));
        assert_eq!(bad.value(), None);
    }

    #[test]
    fn test_error_status_mapping() {
        let err = ApiError::from(LinkError::Wallet("rpc down".into()));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        let err = ApiError::from(LinkError::InvalidAmount("0".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
