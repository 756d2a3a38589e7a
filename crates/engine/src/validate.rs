//! Transaction submission validation.
//!
//! The validator is pure: it inspects a [`TransactionCmd`] and either returns
//! a fully typed [`ValidTransaction`] or an [`EngineError::Validation`] that
//! carries one message per offending field, not just the first one found.

use chrono::{DateTime, Utc};

use crate::{Category, EngineError, LineItem, MoneyCents, ResultEngine, TransactionCmd};

/// A structurally and semantically valid submission, ready for the apply path.
#[derive(Clone, Debug)]
pub struct ValidTransaction {
    pub transaction_id: String,
    pub shopper_id: String,
    pub store_id: String,
    pub occurred_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
}

fn required_text(value: &str, field: &str, problems: &mut Vec<String>) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        problems.push(format!("{field} must not be empty"));
    }
    trimmed.to_string()
}

pub fn validate(cmd: &TransactionCmd) -> ResultEngine<ValidTransaction> {
    let mut problems = Vec::new();

    let transaction_id = required_text(&cmd.transaction_id, "transaction_id", &mut problems);
    let shopper_id = required_text(&cmd.shopper_id, "shopper_id", &mut problems);
    let store_id = required_text(&cmd.store_id, "store_id", &mut problems);

    let occurred_at = match DateTime::parse_from_rfc3339(cmd.timestamp.trim()) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(_) => {
            problems.push("timestamp must be a valid RFC3339 instant".to_string());
            None
        }
    };

    if cmd.items.is_empty() {
        problems.push("items must not be empty".to_string());
    }

    let mut items = Vec::with_capacity(cmd.items.len());
    for (index, raw) in cmd.items.iter().enumerate() {
        let sku = required_text(&raw.sku, &format!("items[{index}].sku"), &mut problems);
        let name = required_text(&raw.name, &format!("items[{index}].name"), &mut problems);

        if raw.quantity < 1 {
            problems.push(format!("items[{index}].quantity must be >= 1"));
        }

        let unit_price = match MoneyCents::try_from_major(raw.unit_price) {
            Ok(price) if price.is_negative() => {
                problems.push(format!("items[{index}].unit_price must be >= 0"));
                None
            }
            Ok(price) => Some(price),
            Err(_) => {
                problems.push(format!(
                    "items[{index}].unit_price must be a non-negative amount with at most 2 decimals"
                ));
                None
            }
        };

        let category = match Category::try_from(raw.category.trim()) {
            Ok(category) => Some(category),
            Err(_) => {
                problems.push(format!(
                    "items[{index}].category must be one of grocery, promo, electronics, clothing, other"
                ));
                None
            }
        };

        if let (Some(unit_price), Some(category)) = (unit_price, category) {
            if raw.quantity >= 1 {
                items.push(LineItem {
                    sku,
                    name,
                    quantity: raw.quantity,
                    unit_price,
                    category,
                });
            }
        }
    }

    if !problems.is_empty() {
        return Err(EngineError::Validation(problems));
    }

    // occurred_at is Some by construction when no problem was recorded.
    let occurred_at = occurred_at
        .ok_or_else(|| EngineError::Validation(vec!["timestamp must be a valid RFC3339 instant".to_string()]))?;

    Ok(ValidTransaction {
        transaction_id,
        shopper_id,
        store_id,
        occurred_at,
        items,
    })
}
