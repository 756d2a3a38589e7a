//! Line item primitives.
//!
//! A transaction carries a non-empty ordered list of `LineItem`s. Items are
//! persisted verbatim as a JSON column on the transaction row so the lookup
//! path can replay them for client display.

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Product category of a line item.
///
/// `Promo` lines earn the promo bonus sticker (see `rewards`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Grocery,
    Promo,
    Electronics,
    Clothing,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grocery => "grocery",
            Self::Promo => "promo",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "grocery" => Ok(Self::Grocery),
            "promo" => Ok(Self::Promo),
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(vec![format!(
                "invalid category: {other}"
            )])),
        }
    }
}

/// A validated purchase line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    /// Unit price in cents.
    pub unit_price: MoneyCents,
    pub category: Category,
}

impl LineItem {
    /// Line subtotal (`quantity × unit_price`) in cents.
    pub fn subtotal(&self) -> Result<MoneyCents, EngineError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| EngineError::invalid_amount("line subtotal overflows"))
    }
}
