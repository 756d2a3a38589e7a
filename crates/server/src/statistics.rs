//! Ledger-wide statistics endpoint.

use axum::{Json, extract::State, response::IntoResponse};

use api_types::{
    shopper::ShopperSummary,
    stats::{StatsResponse, StoreStickers},
};

use crate::{ServerError, ServerState};

/// `GET /api/stats/`
pub async fn get_stats(State(state): State<ServerState>) -> Result<impl IntoResponse, ServerError> {
    let stats = state.engine.ledger_stats().await?;

    Ok(Json(StatsResponse {
        total_stickers_awarded: stats.total_stickers_awarded,
        total_transactions: stats.total_transactions,
        total_shoppers: stats.total_shoppers,
        avg_stickers_per_transaction: stats.avg_stickers_per_transaction,
        stickers_by_store: stats
            .stickers_by_store
            .into_iter()
            .map(|store| StoreStickers {
                store_id: store.store_id,
                total_stickers: store.total_stickers,
                transaction_count: store.transaction_count,
            })
            .collect(),
        top_shoppers: stats
            .top_shoppers
            .into_iter()
            .map(|shopper| ShopperSummary {
                shopper_id: shopper.shopper_id,
                sticker_balance: shopper.sticker_balance,
            })
            .collect(),
    }))
}
