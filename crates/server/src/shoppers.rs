//! Shopper lookup endpoints.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use api_types::{
    shopper::{ShopperDetailResponse, ShopperSummary},
    transaction::{LineItemView, TransactionView},
};
use engine::Transaction;

use crate::{ServerError, ServerState};

fn transaction_view(transaction: Transaction) -> TransactionView {
    TransactionView {
        transaction_id: transaction.transaction_id,
        timestamp: transaction.occurred_at,
        store_id: transaction.store_id,
        total_amount: transaction.total_amount.format_major(),
        stickers_earned: transaction.stickers_earned,
        items: transaction
            .items
            .into_iter()
            .map(|item| LineItemView {
                sku: item.sku,
                name: item.name,
                quantity: item.quantity,
                unit_price: item.unit_price.cents() as f64 / 100.0,
                category: item.category.as_str().to_string(),
            })
            .collect(),
    }
}

/// `GET /api/shoppers/{shopper_id}/`
pub async fn detail(
    State(state): State<ServerState>,
    Path(shopper_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let detail = state.engine.shopper(&shopper_id).await?;

    Ok(Json(ShopperDetailResponse {
        shopper_id: detail.shopper.shopper_id,
        sticker_balance: detail.shopper.sticker_balance,
        created_at: detail.shopper.created_at,
        transactions: detail.transactions.into_iter().map(transaction_view).collect(),
    }))
}

/// `GET /api/shoppers/`
pub async fn list(State(state): State<ServerState>) -> Result<impl IntoResponse, ServerError> {
    let shoppers = state.engine.list_shoppers().await?;

    let summaries: Vec<ShopperSummary> = shoppers
        .into_iter()
        .map(|shopper| ShopperSummary {
            shopper_id: shopper.shopper_id,
            sticker_balance: shopper.sticker_balance,
        })
        .collect();

    Ok(Json(summaries))
}
