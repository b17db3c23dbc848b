//! Checkout draft: the shipping and payment details collected across steps.
//!
//! Step transitions are linear and unvalidated. The only gate is on order
//! submission: FPX payments need a bank.

use serde::{Deserialize, Serialize};

use super::price::{CurrencyCode, Price};

/// Named checkout steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Information,
    Shipping,
    Payment,
}

impl CheckoutStep {
    pub const ALL: [Self; 3] = [Self::Information, Self::Shipping, Self::Payment];

    /// Following step; the last step stays put.
    #[must_use]
    pub const fn forward(self) -> Self {
        match self {
            Self::Information => Self::Shipping,
            Self::Shipping | Self::Payment => Self::Payment,
        }
    }

    /// Preceding step; the first step stays put.
    #[must_use]
    pub const fn back(self) -> Self {
        match self {
            Self::Information | Self::Shipping => Self::Information,
            Self::Payment => Self::Shipping,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Information => "information",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
        }
    }

    #[must_use]
    pub const fn number(self) -> usize {
        match self {
            Self::Information => 1,
            Self::Shipping => 2,
            Self::Payment => 3,
        }
    }
}

/// Contact details entered on the information step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl CustomerInfo {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Delivery address entered on the shipping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            address1: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            postcode: String::new(),
            country: "Malaysia".to_string(),
        }
    }
}

/// Delivery speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    pub const ALL: [Self; 2] = [Self::Standard, Self::Express];

    /// Fee charged for the method.
    #[must_use]
    pub fn fee(self, currency: CurrencyCode) -> Price {
        match self {
            Self::Standard => Price::zero(currency),
            Self::Express => Price::from_minor(1500, currency),
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }

    /// Parse a form value; unknown values fall back to `Standard`.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == value)
            .unwrap_or_default()
    }
}

/// How the shopper pays. Payment is simulated for every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    /// Malaysian online banking.
    Fpx,
    CashOnDelivery,
}

impl PaymentMethod {
    pub const ALL: [Self; 3] = [Self::Card, Self::Fpx, Self::CashOnDelivery];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Fpx => "fpx",
            Self::CashOnDelivery => "cod",
        }
    }

    /// Parse a form value; unknown values fall back to `Card`.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == value)
            .unwrap_or_default()
    }
}

/// Banks offered for FPX payments, as `(code, display name)`.
pub const FPX_BANKS: [(&str, &str); 12] = [
    ("maybank2u", "Maybank2u"),
    ("cimb", "CIMB Clicks"),
    ("public_bank", "Public Bank"),
    ("rhb", "RHB Now"),
    ("hong_leong", "Hong Leong Connect"),
    ("ambank", "AmOnline"),
    ("bank_islam", "Bank Islam"),
    ("bank_rakyat", "Bank Rakyat"),
    ("bsn", "BSN"),
    ("affin", "Affin Bank"),
    ("alliance", "Alliance Bank"),
    ("ocbc", "OCBC Bank"),
];

/// Display name of an FPX bank code.
#[must_use]
pub fn fpx_bank_name(code: &str) -> Option<&'static str> {
    FPX_BANKS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Payment step selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    /// FPX bank code, when FPX is selected.
    pub fpx_bank: Option<String>,
    pub card_name: String,
    /// Last four digits only; full card numbers are never stored.
    pub card_last4: Option<String>,
}

impl PaymentSelection {
    /// Whether the selection allows an order to be placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.method {
            PaymentMethod::Fpx => self
                .fpx_bank
                .as_deref()
                .is_some_and(|code| fpx_bank_name(code).is_some()),
            PaymentMethod::Card | PaymentMethod::CashOnDelivery => true,
        }
    }
}

/// Keep the last four digits of a card number.
#[must_use]
pub fn card_last4(number: &str) -> Option<String> {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits.iter().skip(digits.len() - 4).collect())
}

/// Everything collected during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDraft {
    pub step: CheckoutStep,
    pub customer: CustomerInfo,
    pub shipping_address: ShippingAddress,
    pub shipping_method: ShippingMethod,
    pub payment: PaymentSelection,
}

impl CheckoutDraft {
    /// Move to the next step.
    pub fn forward(&mut self) {
        self.step = self.step.forward();
    }

    /// Move to the previous step.
    pub fn back(&mut self) {
        self.step = self.step.back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        let mut draft = CheckoutDraft::default();
        assert_eq!(draft.step, CheckoutStep::Information);
        draft.back();
        assert_eq!(draft.step, CheckoutStep::Information);
        draft.forward();
        draft.forward();
        assert_eq!(draft.step, CheckoutStep::Payment);
        draft.forward();
        assert_eq!(draft.step, CheckoutStep::Payment);
        draft.back();
        assert_eq!(draft.step, CheckoutStep::Shipping);
    }

    #[test]
    fn test_fpx_without_bank_is_incomplete() {
        let mut draft = CheckoutDraft::default();
        draft.payment.method = PaymentMethod::Fpx;
        assert!(!draft.payment.is_complete());

        draft.payment.fpx_bank = Some("not-a-bank".to_string());
        assert!(!draft.payment.is_complete());

        draft.payment.fpx_bank = Some("maybank2u".to_string());
        assert!(draft.payment.is_complete());
    }

    #[test]
    fn test_card_and_cod_are_complete_on_any_step() {
        let mut draft = CheckoutDraft::default();
        assert_eq!(draft.step, CheckoutStep::Information);
        assert!(draft.payment.is_complete());
        draft.payment.method = PaymentMethod::CashOnDelivery;
        assert!(draft.payment.is_complete());
    }

    #[test]
    fn test_shipping_fees() {
        assert!(ShippingMethod::Standard.fee(CurrencyCode::MYR).is_zero());
        assert_eq!(
            ShippingMethod::Express.fee(CurrencyCode::MYR).display(),
            "RM 15.00"
        );
        assert_eq!(ShippingMethod::from_form("express"), ShippingMethod::Express);
        assert_eq!(ShippingMethod::from_form("drone"), ShippingMethod::Standard);
    }

    #[test]
    fn test_card_last4() {
        assert_eq!(card_last4("4242 4242 4242 4242").as_deref(), Some("4242"));
        assert_eq!(card_last4("5555-1234").as_deref(), Some("1234"));
        assert_eq!(card_last4("12"), None);
    }

    #[test]
    fn test_payment_method_from_form() {
        assert_eq!(PaymentMethod::from_form("fpx"), PaymentMethod::Fpx);
        assert_eq!(PaymentMethod::from_form("cod"), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::from_form(""), PaymentMethod::Card);
    }
}
