//! Embeddable pay-button payloads
//!
//! The embed script opens `{app_url}/pay?data=<json>` where `<json>` is the
//! payment encoded with `encodeURIComponent` semantics.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{address::is_valid_address, units::parse_positive_amount, Error, Result};

/// Default public app URL
pub const DEFAULT_APP_URL: &str = "https://avaxpay.xyz";

/// Path of the hosted pay page
pub const PAY_PATH: &str = "pay";

/// Query parameter carrying the JSON payload
pub const DATA_PARAM: &str = "data";

/// Characters `encodeURIComponent` leaves alone besides alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Payment carried by an embedded pay button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPayment {
    pub to: String,
    pub amount: String,
    #[serde(default = "default_token")]
    pub token: String,
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_token() -> String {
    "AVAX".to_string()
}

fn default_label() -> String {
    "Pay Now".to_string()
}

impl WidgetPayment {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            token: default_token(),
            label: default_label(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

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

/// `encodeURIComponent` equivalent.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Build the hosted pay-page URL for a widget payment.
pub fn widget_pay_url(app_url: &str, payment: &WidgetPayment) -> Result<String> {
    let json = serde_json::to_string(payment)?;
    Ok(format!(
        "{}/{}?{}={}",
        app_url.trim_end_matches('/'),
        PAY_PATH,
        DATA_PARAM,
        encode_uri_component(&json)
    ))
}

/// Parse and validate an already-decoded JSON payload.
pub fn widget_payment_from_json(json: &str) -> Result<WidgetPayment> {
    let payment: WidgetPayment = serde_json::from_str(json)?;
    payment.validate()?;
    Ok(payment)
}

/// Decode the raw (still percent-encoded) `data` parameter.
pub fn decode_widget_data(data: &str) -> Result<WidgetPayment> {
    let json = percent_decode_str(data)
        .decode_utf8()
        .map_err(|e| Error::InvalidLink(format!("Invalid data encoding: {}", e)))?;
    widget_payment_from_json(&json)
}

/// Decode a full pay-page URL.
pub fn decode_widget_url(pay_url: &str) -> Result<WidgetPayment> {
    let url = Url::parse(pay_url)?;
    // query_pairs already percent-decodes, so parse the JSON directly.
    let data = url
        .query_pairs()
        .find(|(name, _)| name == DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or(Error::MissingParameter(DATA_PARAM))?;
    widget_payment_from_json(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x60Be870885C5b537AC179CfACdcc9Fad145CAC55";

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a b"), "a%20b");
        assert_eq!(encode_uri_component("{\"x\":1}"), "%7B%22x%22%3A1%7D");
        assert_eq!(encode_uri_component("it's (ok)!*~"), "it's%20(ok)!*~");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_widget_url_roundtrip() {
        let payment = WidgetPayment::new(ALICE, "25").with_label("Buy me a coffee");
        let url = widget_pay_url("https://avaxpay.xyz/", &payment).unwrap();
        assert!(url.starts_with("https://avaxpay.xyz/pay?data=%7B"));

        let decoded = decode_widget_url(&url).unwrap();
        assert_eq!(decoded, payment);

        let raw = url.split_once("data=").unwrap().1;
        assert_eq!(decode_widget_data(raw).unwrap(), payment);
    }

    #[test]
    fn test_widget_defaults() {
        let data = encode_uri_component(&format!(r#"{{"to":"{}","amount":"3"}}"#, ALICE));
        let payment = decode_widget_data(&data).unwrap();
        assert_eq!(payment.token, "AVAX");
        assert_eq!(payment.label, "Pay Now");
    }

    #[test]
    fn test_widget_rejects_bad_payloads() {
        assert!(decode_widget_data("not-json").is_err());
        let bad_address = encode_uri_component(r#"{"to":"0x1","amount":"3"}"#);
        assert!(matches!(
            decode_widget_data(&bad_address),
            Err(Error::InvalidAddress(_))
        ));
        let bad_amount = encode_uri_component(&format!(r#"{{"to":"{}","amount":"0"}}"#, ALICE));
        assert!(matches!(
            decode_widget_data(&bad_amount),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            decode_widget_url("https://avaxpay.xyz/pay"),
            Err(Error::MissingParameter("data"))
        ));
    }
}
