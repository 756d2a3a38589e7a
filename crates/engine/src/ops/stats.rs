//! Point-in-time aggregate statistics over the whole ledger.

use sea_orm::{ConnectionTrait, Statement};
use serde::{Deserialize, Serialize};

use crate::ResultEngine;

use super::Engine;

/// How many shoppers the leaderboard keeps.
pub const TOP_SHOPPERS_LIMIT: u64 = 5;

/// Per-store sticker totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub store_id: String,
    pub total_stickers: i64,
    pub transaction_count: i64,
}

/// A leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopShopper {
    pub shopper_id: String,
    pub sticker_balance: i64,
}

/// Aggregates over every applied transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_stickers_awarded: i64,
    pub total_transactions: i64,
    pub total_shoppers: i64,
    /// `0.0` on an empty ledger, rounded to 2 decimals otherwise.
    pub avg_stickers_per_transaction: f64,
    /// Grouped by store, most stickers first.
    pub stickers_by_store: Vec<StoreStats>,
    /// Balance descending, `shopper_id` ascending on ties.
    pub top_shoppers: Vec<TopShopper>,
}

impl Engine {
    /// Computes ledger-wide statistics consistent with the store at read time.
    ///
    /// Always returns well-formed empty structures on an empty ledger.
    pub async fn ledger_stats(&self) -> ResultEngine<LedgerStats> {
        let backend = self.database.get_database_backend();

        let (total_stickers_awarded, total_transactions) = {
            let stmt = Statement::from_string(
                backend,
                "SELECT COALESCE(SUM(stickers_earned), 0) AS total, COUNT(*) AS cnt \
                 FROM transactions",
            );
            let row = self.database.query_one(stmt).await?;
            match row {
                Some(row) => (
                    row.try_get("", "total").unwrap_or(0),
                    row.try_get("", "cnt").unwrap_or(0),
                ),
                None => (0, 0),
            }
        };

        let total_shoppers: i64 = {
            let stmt =
                Statement::from_string(backend, "SELECT COUNT(*) AS cnt FROM shoppers");
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "cnt").ok()).unwrap_or(0)
        };

        let avg_stickers_per_transaction = if total_transactions == 0 {
            0.0
        } else {
            let avg = total_stickers_awarded as f64 / total_transactions as f64;
            (avg * 100.0).round() / 100.0
        };

        let stickers_by_store = {
            let stmt = Statement::from_string(
                backend,
                "SELECT store_id, COALESCE(SUM(stickers_earned), 0) AS total_stickers, \
                 COUNT(*) AS transaction_count \
                 FROM transactions \
                 GROUP BY store_id \
                 ORDER BY total_stickers DESC, store_id ASC",
            );
            let rows = self.database.query_all(stmt).await?;
            let mut stores = Vec::with_capacity(rows.len());
            for row in rows {
                stores.push(StoreStats {
                    store_id: row.try_get("", "store_id")?,
                    total_stickers: row.try_get("", "total_stickers")?,
                    transaction_count: row.try_get("", "transaction_count")?,
                });
            }
            stores
        };

        let top_shoppers = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT shopper_id, sticker_balance FROM shoppers \
                 ORDER BY sticker_balance DESC, shopper_id ASC \
                 LIMIT ?",
                vec![(TOP_SHOPPERS_LIMIT as i64).into()],
            );
            let rows = self.database.query_all(stmt).await?;
            let mut shoppers = Vec::with_capacity(rows.len());
            for row in rows {
                shoppers.push(TopShopper {
                    shopper_id: row.try_get("", "shopper_id")?,
                    sticker_balance: row.try_get("", "sticker_balance")?,
                });
            }
            shoppers
        };

        Ok(LedgerStats {
            total_stickers_awarded,
            total_transactions,
            total_shoppers,
            avg_stickers_per_transaction,
            stickers_by_store,
            top_shoppers,
        })
    }
}
