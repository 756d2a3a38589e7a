//! Shared JSON types for the sticker reward API.
//!
//! These DTOs define the wire contract between the server and the support
//! portal client; the engine keeps its own domain types and the server maps
//! between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod transaction {
    use super::*;

    /// Request body for `POST /api/transactions/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Idempotency key: resubmitting the same id replays the original result.
        pub transaction_id: String,
        pub shopper_id: String,
        pub store_id: String,
        /// RFC3339 timestamp. Sent as a string so a malformed instant becomes
        /// a field-level validation error instead of a body rejection.
        pub timestamp: String,
        pub items: Vec<LineItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemNew {
        pub sku: String,
        pub name: String,
        pub quantity: i64,
        /// Unit price in dollars.
        pub unit_price: f64,
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Breakdown {
        /// Base + promo stickers before the per-transaction cap.
        pub raw_total: i64,
        pub capped: bool,
    }

    /// Response body for `POST /api/transactions/` (201 new, 200 duplicate).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionApplied {
        pub transaction_id: String,
        pub shopper_id: String,
        pub stickers_earned: i64,
        pub new_balance: i64,
        pub breakdown: Breakdown,
        pub is_duplicate: bool,
    }

    /// One applied transaction in a shopper's history.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub transaction_id: String,
        pub timestamp: DateTime<Utc>,
        pub store_id: String,
        /// Basket total as a 2-decimal string, e.g. `"23.50"`.
        pub total_amount: String,
        pub stickers_earned: i64,
        pub items: Vec<LineItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemView {
        pub sku: String,
        pub name: String,
        pub quantity: i64,
        /// Unit price in dollars.
        pub unit_price: f64,
        pub category: String,
    }
}

pub mod shopper {
    use super::*;

    /// Entry of `GET /api/shoppers/` and of the stats leaderboard.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopperSummary {
        pub shopper_id: String,
        pub sticker_balance: i64,
    }

    /// Response body for `GET /api/shoppers/{shopper_id}/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopperDetailResponse {
        pub shopper_id: String,
        pub sticker_balance: i64,
        pub created_at: DateTime<Utc>,
        /// Transactions in submission order.
        pub transactions: Vec<super::transaction::TransactionView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StoreStickers {
        pub store_id: String,
        pub total_stickers: i64,
        pub transaction_count: i64,
    }

    /// Response body for `GET /api/stats/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsResponse {
        pub total_stickers_awarded: i64,
        pub total_transactions: i64,
        pub total_shoppers: i64,
        pub avg_stickers_per_transaction: f64,
        pub stickers_by_store: Vec<StoreStickers>,
        pub top_shoppers: Vec<super::shopper::ShopperSummary>,
    }
}
