//! Payment deep-link encoding and decoding
//!
//! ## Link Format
//!
//! ```text
//! avaxpay://send?to=<addr>&amount=<decimal>[&token=<SYM>][&label=..][&memo=..][&chainId=<int>]
//! avaxpay://batch?recipients=<addr,addr,..>&amounts=<dec,dec,..>[&token=<SYM>][&label=..]
//! ```
//!
//! The query uses `application/x-www-form-urlencoded` encoding. The same
//! query under an `https://host/send` or `https://host/batch` URL decodes
//! identically.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::{
    address::is_valid_address, registry::Registry, units::parse_positive_amount, Error, Result,
};

/// Default custom URL scheme
pub const DEFAULT_SCHEME: &str = "avaxpay";

/// Link target for a single payment
pub const SEND_TARGET: &str = "send";

/// Link target for a batch payment
pub const BATCH_TARGET: &str = "batch";

const PARAM_TO: &str = "to";
const PARAM_AMOUNT: &str = "amount";
const PARAM_TOKEN: &str = "token";
const PARAM_LABEL: &str = "label";
const PARAM_MEMO: &str = "memo";
const PARAM_CHAIN_ID: &str = "chainId";
const PARAM_RECIPIENTS: &str = "recipients";
const PARAM_AMOUNTS: &str = "amounts";

const LIST_SEPARATOR: char = ',';

/// A single-payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Recipient address
    pub to: String,
    /// Human-readable decimal amount
    pub amount: String,
    /// Token symbol; `None` means the native asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

impl PaymentRequest {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            token: None,
            label: None,
            memo: None,
            chain_id: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Check the required fields: a valid recipient and a positive amount.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_address(&self.to) {
            return Err(Error::InvalidAddress(self.to.clone()));
        }
        if parse_positive_amount(&self.amount).is_none() {
            return Err(Error::InvalidAmount(self.amount.clone()));
        }
        Ok(())
    }
}

/// A batch payment: parallel recipient and amount lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPaymentRequest {
    pub recipients: Vec<String>,
    pub amounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BatchPaymentRequest {
    /// Create a batch, failing if the two lists differ in length.
    pub fn new(recipients: Vec<String>, amounts: Vec<String>) -> Result<Self> {
        check_batch_lengths(&recipients, &amounts)?;
        Ok(Self {
            recipients,
            amounts,
            token: None,
            label: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// `(recipient, amount)` pairs in order.
    pub fn payments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.recipients
            .iter()
            .map(String::as_str)
            .zip(self.amounts.iter().map(String::as_str))
    }

    /// Check list lengths, every recipient and every amount.
    pub fn validate(&self) -> Result<()> {
        check_batch_lengths(&self.recipients, &self.amounts)?;
        if self.recipients.is_empty() {
            return Err(Error::MissingParameter(PARAM_RECIPIENTS));
        }
        if let Some(bad) = self.recipients.iter().find(|r| !is_valid_address(r)) {
            return Err(Error::InvalidAddress(bad.clone()));
        }
        if let Some(bad) = self
            .amounts
            .iter()
            .find(|a| parse_positive_amount(a).is_none())
        {
            return Err(Error::InvalidAmount(bad.clone()));
        }
        Ok(())
    }
}

fn check_batch_lengths(recipients: &[String], amounts: &[String]) -> Result<()> {
    if recipients.len() != amounts.len() {
        return Err(Error::BatchLengthMismatch {
            recipients: recipients.len(),
            amounts: amounts.len(),
        });
    }
    Ok(())
}

/// Any decoded link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeepLink {
    Payment(PaymentRequest),
    Batch(BatchPaymentRequest),
}

/// Encoder/decoder for payment links, bound to a registry and URL scheme
#[derive(Debug, Clone)]
pub struct LinkCodec {
    registry: Arc<Registry>,
    scheme: String,
}

impl Default for LinkCodec {
    fn default() -> Self {
        Self::new(Arc::new(Registry::avalanche()))
    }
}

impl LinkCodec {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    /// Use a different custom scheme (without `://`).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Encode a payment request as `<scheme>://send?...`.
    pub fn encode_payment_link(&self, request: &PaymentRequest) -> String {
        format!(
            "{}://{}?{}",
            self.scheme,
            SEND_TARGET,
            self.payment_query(request)
        )
    }

    /// Encode a payment request as a web link under `base_url`, e.g.
    /// `https://avaxpay.xyz/send?...`.
    pub fn encode_web_link(&self, base_url: &str, request: &PaymentRequest) -> String {
        format!(
            "{}/{}?{}",
            base_url.trim_end_matches('/'),
            SEND_TARGET,
            self.payment_query(request)
        )
    }

    fn payment_query(&self, request: &PaymentRequest) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair(PARAM_TO, &request.to);
        query.append_pair(PARAM_AMOUNT, &request.amount);

        if let Some(token) = non_empty(&request.token) {
            if !self.registry.is_native_token(token) {
                query.append_pair(PARAM_TOKEN, token);
            }
        }
        if let Some(label) = non_empty(&request.label) {
            query.append_pair(PARAM_LABEL, label);
        }
        if let Some(memo) = non_empty(&request.memo) {
            query.append_pair(PARAM_MEMO, memo);
        }
        if let Some(chain_id) = request.chain_id {
            query.append_pair(PARAM_CHAIN_ID, &chain_id.to_string());
        }
        query.finish()
    }

    /// Decode a payment link, returning `None` for any malformed input.
    pub fn decode_payment_link(&self, link: &str) -> Option<PaymentRequest> {
        self.try_decode_payment_link(link)
            .map_err(|e| tracing::debug!(error = %e, "rejected payment link"))
            .ok()
    }

    /// Decode a payment link, reporting why it was rejected.
    pub fn try_decode_payment_link(&self, link: &str) -> Result<PaymentRequest> {
        let url = self.parse_url(link)?;
        self.payment_from_params(&QueryParams::from_url(&url))
    }

    fn payment_from_params(&self, params: &QueryParams) -> Result<PaymentRequest> {
        let to = params
            .get(PARAM_TO)
            .ok_or(Error::MissingParameter(PARAM_TO))?;
        let amount = params
            .get(PARAM_AMOUNT)
            .ok_or(Error::MissingParameter(PARAM_AMOUNT))?;

        if !is_valid_address(to) {
            return Err(Error::InvalidAddress(to.to_string()));
        }
        if parse_positive_amount(amount).is_none() {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        let chain_id = match params.get(PARAM_CHAIN_ID) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::InvalidLink(format!("Invalid chainId: {}", raw)))?,
            None => self.registry.default_chain_id(),
        };

        Ok(PaymentRequest {
            to: to.to_string(),
            amount: amount.to_string(),
            token: params.get_owned(PARAM_TOKEN),
            label: params.get_owned(PARAM_LABEL),
            memo: params.get_owned(PARAM_MEMO),
            chain_id: Some(chain_id),
        })
    }

    /// Encode a batch as `<scheme>://batch?...`.
    ///
    /// Fails if recipients and amounts differ in length.
    pub fn encode_batch_payment_link(&self, request: &BatchPaymentRequest) -> Result<String> {
        check_batch_lengths(&request.recipients, &request.amounts)?;

        let recipients = request.recipients.join(",");
        let amounts = request.amounts.join(",");

        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair(PARAM_RECIPIENTS, &recipients);
        query.append_pair(PARAM_AMOUNTS, &amounts);

        if let Some(token) = non_empty(&request.token) {
            if !self.registry.is_native_token(token) {
                query.append_pair(PARAM_TOKEN, token);
            }
        }
        if let Some(label) = non_empty(&request.label) {
            query.append_pair(PARAM_LABEL, label);
        }

        Ok(format!("{}://{}?{}", self.scheme, BATCH_TARGET, query.finish()))
    }

    /// Decode a batch link, returning `None` for any malformed input.
    pub fn decode_batch_payment_link(&self, link: &str) -> Option<BatchPaymentRequest> {
        self.try_decode_batch_payment_link(link)
            .map_err(|e| tracing::debug!(error = %e, "rejected batch payment link"))
            .ok()
    }

    pub fn try_decode_batch_payment_link(&self, link: &str) -> Result<BatchPaymentRequest> {
        let url = self.parse_url(link)?;
        self.batch_from_params(&QueryParams::from_url(&url))
    }

    fn batch_from_params(&self, params: &QueryParams) -> Result<BatchPaymentRequest> {
        let recipients = params
            .get(PARAM_RECIPIENTS)
            .ok_or(Error::MissingParameter(PARAM_RECIPIENTS))?;
        let amounts = params
            .get(PARAM_AMOUNTS)
            .ok_or(Error::MissingParameter(PARAM_AMOUNTS))?;

        let batch = BatchPaymentRequest {
            recipients: split_list(recipients),
            amounts: split_list(amounts),
            token: params.get_owned(PARAM_TOKEN),
            label: params.get_owned(PARAM_LABEL),
        };
        batch.validate()?;
        Ok(batch)
    }

    /// Decode any link, dispatching on its target (`send` or `batch`).
    pub fn decode_link(&self, link: &str) -> Result<DeepLink> {
        let url = self.parse_url(link)?;
        let params = QueryParams::from_url(&url);
        match link_target(&url) {
            Some(SEND_TARGET) => self.payment_from_params(&params).map(DeepLink::Payment),
            Some(BATCH_TARGET) => self.batch_from_params(&params).map(DeepLink::Batch),
            other => Err(Error::InvalidLink(format!(
                "Unknown link target: {}",
                other.unwrap_or("")
            ))),
        }
    }

    /// Parse either `<scheme>://...` or a regular web URL.
    fn parse_url(&self, link: &str) -> Result<Url> {
        let link = link.trim();
        let prefix = format!("{}://", self.scheme);
        let url = match link.strip_prefix(&prefix) {
            Some(rest) => Url::parse(&format!("http://{}", rest))?,
            None => Url::parse(link)?,
        };
        Ok(url)
    }
}

/// The last non-empty path segment, or the host for `scheme://target?..` links.
fn link_target(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .or_else(|| url.host_str())
}

fn split_list(value: &str) -> Vec<String> {
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Decoded query parameters; the first occurrence of a name wins.
struct QueryParams(HashMap<String, String>);

impl QueryParams {
    fn from_url(url: &Url) -> Self {
        let mut params = HashMap::new();
        for (name, value) in url.query_pairs() {
            params
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    /// A parameter value; empty values count as absent.
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn get_owned(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AVALANCHE_CHAIN_ID, FUJI_CHAIN_ID};
    use proptest::prelude::*;

    const ALICE: &str = "0x60Be870885C5b537AC179CfACdcc9Fad145CAC55";
    const BOB: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb0";
    const SAMPLE: &str = "0x60be863b6a27d78da0b89c088a8a9f23a1d02817";

    fn codec() -> LinkCodec {
        LinkCodec::default()
    }

    #[test]
    fn test_encode_required_only() {
        let link = codec().encode_payment_link(&PaymentRequest::new(ALICE, "1.5"));
        assert_eq!(link, format!("avaxpay://send?to={}&amount=1.5", ALICE));
    }

    #[test]
    fn test_encode_all_fields() {
        let request = PaymentRequest::new(ALICE, "1.5")
            .with_token("USDC")
            .with_label("Coffee payment")
            .with_memo("Thanks!")
            .with_chain_id(AVALANCHE_CHAIN_ID);
        let link = codec().encode_payment_link(&request);
        assert_eq!(
            link,
            format!(
                "avaxpay://send?to={}&amount=1.5&token=USDC&label=Coffee+payment&memo=Thanks%21&chainId=43114",
                ALICE
            )
        );
    }

    #[test]
    fn test_encode_omits_empty_and_native() {
        let request = PaymentRequest::new(ALICE, "2")
            .with_token("AVAX")
            .with_label("")
            .with_memo("");
        let link = codec().encode_payment_link(&request);
        assert!(!link.contains("token"));
        assert!(!link.contains("label"));
        assert!(!link.contains("memo"));
        assert!(!link.contains("chainId"));

        let zero = PaymentRequest::new(ALICE, "2").with_token("0x0");
        assert!(!codec().encode_payment_link(&zero).contains("token"));
    }

    #[test]
    fn test_roundtrip_required_only() {
        let codec = codec();
        let request = PaymentRequest::new(ALICE, "1.5");
        let decoded = codec
            .decode_payment_link(&codec.encode_payment_link(&request))
            .unwrap();
        // chainId is filled in with the default network on decode.
        assert_eq!(decoded, request.with_chain_id(FUJI_CHAIN_ID));
    }

    #[test]
    fn test_roundtrip_all_fields() {
        let codec = codec();
        let request = PaymentRequest::new(BOB, "0.25")
            .with_token("USDT")
            .with_label("Dinner & drinks, 50/50")
            .with_memo("ünïcödé ✓ + more")
            .with_chain_id(AVALANCHE_CHAIN_ID);
        let decoded = codec
            .decode_payment_link(&codec.encode_payment_link(&request))
            .unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_native_token_asymmetry() {
        let codec = codec();
        let request = PaymentRequest::new(SAMPLE, "100")
            .with_token("AVAX")
            .with_label("Monthly subscription");
        let link = codec.encode_payment_link(&request);
        assert!(!link.contains("token="));

        let decoded = codec.decode_payment_link(&link).unwrap();
        assert_eq!(decoded.to, SAMPLE);
        assert_eq!(decoded.amount, "100");
        assert_eq!(decoded.label.as_deref(), Some("Monthly subscription"));
        assert_eq!(decoded.token, None);
        assert_eq!(decoded.chain_id, Some(FUJI_CHAIN_ID));
    }

    #[test]
    fn test_decode_keeps_explicit_native_token() {
        let link = format!("avaxpay://send?to={}&amount=1&token=AVAX", ALICE);
        let decoded = codec().decode_payment_link(&link).unwrap();
        assert_eq!(decoded.token.as_deref(), Some("AVAX"));
    }

    #[test]
    fn test_decode_web_link_matches_custom_scheme() {
        let codec = codec();
        let request = PaymentRequest::new(SAMPLE, "100").with_label("Monthly subscription");
        let custom = codec.encode_payment_link(&request);
        let web = codec.encode_web_link("https://avaxpay.xyz/", &request);
        assert!(web.starts_with("https://avaxpay.xyz/send?"));
        assert_eq!(
            codec.decode_payment_link(&custom),
            codec.decode_payment_link(&web)
        );

        let dashboard = "http://localhost:3000/send?to=0x60be863b6a27d78da0b89c088a8a9f23a1d02817&amount=100&token=AVAX&label=Monthly%20subscription";
        let decoded = codec.decode_payment_link(dashboard).unwrap();
        assert_eq!(decoded.label.as_deref(), Some("Monthly subscription"));
    }

    #[test]
    fn test_decode_keeps_address_case() {
        let link = format!("avaxpay://send?to={}&amount=3", ALICE);
        assert_eq!(codec().decode_payment_link(&link).unwrap().to, ALICE);
    }

    #[test]
    fn test_decode_rejects() {
        let codec = codec();
        let cases = [
            format!("avaxpay://send?amount=1"),
            format!("avaxpay://send?to={}", ALICE),
            format!("avaxpay://send?to=0x123&amount=1"),
            format!("avaxpay://send?to={}&amount=0", ALICE),
            format!("avaxpay://send?to={}&amount=-5", ALICE),
            format!("avaxpay://send?to={}&amount=abc", ALICE),
            format!("avaxpay://send?to={}&amount=", ALICE),
            format!("avaxpay://send?to={}&amount=1&chainId=fuji", ALICE),
            "not a url".to_string(),
            "http://[::1".to_string(),
            String::new(),
        ];
        for link in cases {
            assert!(codec.decode_payment_link(&link).is_none(), "{}", link);
        }
    }

    #[test]
    fn test_try_decode_reports_reason() {
        let err = codec()
            .try_decode_payment_link("avaxpay://send?amount=1")
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter("to")));

        let err = codec()
            .try_decode_payment_link("::::")
            .unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }

    #[test]
    fn test_custom_scheme() {
        let codec = LinkCodec::default().with_scheme("paylink");
        let link = codec.encode_payment_link(&PaymentRequest::new(ALICE, "1"));
        assert!(link.starts_with("paylink://send?"));
        assert!(codec.decode_payment_link(&link).is_some());
    }

    #[test]
    fn test_batch_roundtrip() {
        let codec = codec();
        let batch = BatchPaymentRequest::new(
            vec![ALICE.to_string(), BOB.to_string()],
            vec!["1.5".to_string(), "2.0".to_string()],
        )
        .unwrap()
        .with_token("USDC")
        .with_label("Dinner split");

        let link = codec.encode_batch_payment_link(&batch).unwrap();
        assert!(link.starts_with("avaxpay://batch?recipients="));
        assert!(link.contains("%2C"));

        let decoded = codec.decode_batch_payment_link(&link).unwrap();
        assert_eq!(decoded, batch);
        assert_eq!(decoded.payments().count(), 2);
    }

    #[test]
    fn test_batch_length_mismatch() {
        let err = BatchPaymentRequest::new(vec![ALICE.to_string()], Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::BatchLengthMismatch {
                recipients: 1,
                amounts: 0
            }
        ));

        let forged = BatchPaymentRequest {
            recipients: vec![ALICE.to_string(), BOB.to_string()],
            amounts: vec!["1".to_string()],
            token: None,
            label: None,
        };
        assert!(codec().encode_batch_payment_link(&forged).is_err());
    }

    #[test]
    fn test_batch_decode_rejects() {
        let codec = codec();
        let cases = [
            format!("avaxpay://batch?recipients={},{}&amounts=1", ALICE, BOB),
            format!("avaxpay://batch?recipients={},0x123&amounts=1,2", ALICE),
            format!("avaxpay://batch?recipients={},{}&amounts=1,0", ALICE, BOB),
            format!("avaxpay://batch?recipients={},{}&amounts=1,x", ALICE, BOB),
            format!("avaxpay://batch?recipients={}", ALICE),
            format!("avaxpay://batch?amounts=1"),
        ];
        for link in cases {
            assert!(codec.decode_batch_payment_link(&link).is_none(), "{}", link);
        }
    }

    #[test]
    fn test_decode_link_dispatch() {
        let codec = codec();
        let single = codec.encode_payment_link(&PaymentRequest::new(ALICE, "1"));
        assert!(matches!(codec.decode_link(&single), Ok(DeepLink::Payment(_))));

        let batch = BatchPaymentRequest::new(vec![BOB.to_string()], vec!["4".to_string()]).unwrap();
        let link = codec.encode_batch_payment_link(&batch).unwrap();
        assert!(matches!(codec.decode_link(&link), Ok(DeepLink::Batch(_))));

        let web = format!("https://avaxpay.xyz/batch?recipients={}&amounts=4", BOB);
        assert!(matches!(codec.decode_link(&web), Ok(DeepLink::Batch(_))));

        let unknown = format!("avaxpay://subscribe?to={}&amount=1", ALICE);
        assert!(matches!(codec.decode_link(&unknown), Err(Error::InvalidLink(_))));
    }

    #[test]
    fn test_deep_link_json_tag() {
        let link = DeepLink::Payment(PaymentRequest::new(ALICE, "1"));
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["type"], "payment");
        assert_eq!(json["to"], ALICE);
    }

    #[test]
    fn test_request_validate() {
        assert!(PaymentRequest::new(ALICE, "1").validate().is_ok());
        assert!(PaymentRequest::new("0x1", "1").validate().is_err());
        assert!(PaymentRequest::new(ALICE, "0").validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_payment_roundtrip(
            hex in "[0-9a-fA-F]{40}",
            whole in 1u64..1_000_000,
            frac in proptest::option::of("[0-9]{1,6}"),
            token in proptest::option::of(prop_oneof![Just("USDC"), Just("USDT")]),
            label in proptest::option::of("[ -~]{1,24}"),
            memo in proptest::option::of("\\PC{1,16}"),
            chain_id in proptest::option::of(prop_oneof![Just(FUJI_CHAIN_ID), Just(AVALANCHE_CHAIN_ID)]),
        ) {
            let amount = match frac {
                Some(f) => format!("{}.{}", whole, f),
                None => whole.to_string(),
            };
            let request = PaymentRequest {
                to: format!("0x{}", hex),
                amount,
                token: token.map(str::to_string),
                label: label.filter(|l| !l.is_empty()),
                memo: memo.filter(|m| !m.is_empty()),
                chain_id,
            };
            let codec = LinkCodec::default();
            let decoded = codec.decode_payment_link(&codec.encode_payment_link(&request));
            let expected = PaymentRequest {
                chain_id: Some(chain_id.unwrap_or(FUJI_CHAIN_ID)),
                ..request
            };
            prop_assert_eq!(decoded, Some(expected));
        }
    }
}
