//! Validation for the "create payment link" form
//!
//! Field-level errors are collected before any link is encoded, so the caller
//! can show every problem at once.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    address::{is_valid_address, is_x_chain_address},
    link::PaymentRequest,
    units::parse_positive_amount,
    Error,
};

/// Tokens selectable when creating a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    #[default]
    Avax,
    Usdc,
    Usdt,
}

impl TokenSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Avax => "AVAX",
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Usdt => "USDT",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenSymbol::Avax)
    }
}

impl FromStr for TokenSymbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAX" => Ok(TokenSymbol::Avax),
            "USDC" => Ok(TokenSymbol::Usdc),
            "USDT" => Ok(TokenSymbol::Usdt),
            _ => Err(Error::UnknownToken(s.to_string())),
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Form field names, as reported in [`FieldErrors`]
pub mod field {
    pub const RECIPIENT_WALLET: &str = "recipientWallet";
    pub const AMOUNT: &str = "amount";
    pub const DESCRIPTION: &str = "description";
    pub const EMAIL: &str = "email";
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn insert(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Input of the payment-link form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkForm {
    pub recipient_wallet: String,
    pub amount: String,
    #[serde(default)]
    pub token: TokenSymbol,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Recipient may be a C-Chain `0x` address or an X-Chain address.
fn is_valid_recipient(address: &str) -> bool {
    is_valid_address(address) || is_x_chain_address(address)
}

/// Loose `local@domain.tld` shape check, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

impl PaymentLinkForm {
    /// Validate every field, collecting all errors.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.recipient_wallet.trim().is_empty() {
            errors.insert(
                field::RECIPIENT_WALLET,
                "Recipient wallet address is required",
            );
        } else if !is_valid_recipient(&self.recipient_wallet) {
            errors.insert(field::RECIPIENT_WALLET, "Invalid wallet address format");
        }

        if parse_positive_amount(&self.amount).is_none() {
            errors.insert(field::AMOUNT, "Amount must be greater than 0");
        }

        if self.description.trim().is_empty() {
            errors.insert(field::DESCRIPTION, "Description is required");
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            if !is_valid_email(email) {
                errors.insert(field::EMAIL, "Invalid email address");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert into a [`PaymentRequest`].
    ///
    /// The description becomes the link label. X-Chain recipients pass
    /// [`validate`](Self::validate) but cannot be encoded into a link.
    pub fn into_payment_request(self, chain_id: Option<u64>) -> Result<PaymentRequest, FieldErrors> {
        self.validate()?;
        if !is_valid_address(&self.recipient_wallet) {
            let mut errors = FieldErrors::default();
            errors.insert(
                field::RECIPIENT_WALLET,
                "Payment links need a C-Chain (0x) address",
            );
            return Err(errors);
        }
        Ok(PaymentRequest {
            to: self.recipient_wallet,
            amount: self.amount,
            token: Some(self.token.as_str().to_string()),
            label: Some(self.description),
            memo: self.memo.filter(|m| !m.is_empty()),
            chain_id,
        })
    }
}
