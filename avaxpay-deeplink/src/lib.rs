//! # AvaxPay payment links
//!
//! This crate implements the AvaxPay deep-link protocol: payment and batch
//! payment requests encoded as URLs that any wallet or browser can open,
//! plus the validation and display helpers shared by the web app, the HTTP
//! service and the CLI.
//!
//! ## Link format
//!
//! ```text
//! avaxpay://send?to=0x60be...2817&amount=100&token=USDC&label=Invoice&chainId=43113
//! avaxpay://batch?recipients=0xaa..,0xbb..&amounts=1,2&token=USDC
//! https://avaxpay.xyz/send?to=0x60be...2817&amount=100
//! ```
//!
//! Query values use `application/x-www-form-urlencoded` encoding. The
//! native asset (AVAX) is never written as `token`; a decoded link without
//! `token` means AVAX. A missing `chainId` decodes to the registry default.
//!
//! ## Modules
//!
//! - [`link`]: encode / decode of payment and batch links
//! - [`registry`]: networks, deployed contracts and token metadata
//! - [`units`], [`format`]: amount conversion and dashboard formatting
//! - [`form`], [`widget`]: payment-link form validation and embed payloads
//! - [`onramp`]: fiat on-ramp quotes and demo sessions
//! - [`wallet`]: the wallet / RPC collaborator boundary

mod error;

pub mod address;
pub mod form;
pub mod format;
pub mod link;
pub mod onramp;
pub mod registry;
pub mod units;
pub mod wallet;
pub mod widget;

pub use address::{is_valid_address, shorten_address, ZERO_ADDRESS};
pub use error::{Error, Result};
pub use form::{FieldErrors, PaymentLinkForm, TokenSymbol};
pub use format::{calculate_mrr, format_amount, format_currency, interval_text};
pub use link::{BatchPaymentRequest, DeepLink, LinkCodec, PaymentRequest, DEFAULT_SCHEME};
pub use onramp::{DemoOnRamp, OnRampConfig, OnRampProvider, OnRampRequest, OnRampSession};
pub use registry::{Registry, TokenInfo, AVALANCHE_CHAIN_ID, FUJI_CHAIN_ID};
pub use units::{format_units, parse_amount};
pub use wallet::{PaymentSender, Subscription, SubscriptionSummary, WalletClient};
pub use widget::{WidgetPayment, DEFAULT_APP_URL};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_codec_uses_fuji() {
        let codec = LinkCodec::default();
        assert_eq!(codec.scheme(), DEFAULT_SCHEME);
        assert_eq!(codec.registry().default_chain_id(), FUJI_CHAIN_ID);
    }

    #[test]
    fn test_end_to_end_native_asymmetry() {
        let codec = LinkCodec::default();
        let request = PaymentRequest::new("0x60be863b6a27d78da0b89c088a8a9f23a1d02817", "100")
            .with_token("AVAX")
            .with_label("Monthly subscription");

        let link = codec.encode_payment_link(&request);
        assert!(!link.contains("token="));

        let decoded = codec.decode_payment_link(&link).unwrap();
        assert_eq!(decoded.to, request.to);
        assert_eq!(decoded.amount, "100");
        assert_eq!(decoded.label.as_deref(), Some("Monthly subscription"));
        assert_eq!(decoded.token, None);
    }

    #[test]
    fn test_batch_link_shape() {
        let codec = LinkCodec::default();
        let request = BatchPaymentRequest::new(
            vec![
                "0x60be863b6a27d78da0b89c088a8a9f23a1d02817".to_string(),
                "0x9f7f7e1b2b3c4d5e6f708192a3b4c5d6e7f80910".to_string(),
            ],
            vec!["1".to_string(), "2".to_string()],
        )
        .unwrap()
        .with_token("USDC");

        let link = codec.encode_batch_payment_link(&request).unwrap();
        assert!(link.starts_with("avaxpay://batch?recipients="));
        assert!(link.contains("&amounts=1%2C2&token=USDC"));
        assert!(!link.contains("chainId"));
    }
}
