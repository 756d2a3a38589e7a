//! Transaction submission endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use api_types::transaction::{Breakdown, TransactionApplied, TransactionNew};
use engine::{LineItemInput, TransactionCmd};

use crate::{ApiJson, ServerError, ServerState};

/// `POST /api/transactions/`: 201 on first application, 200 on a replay.
pub async fn apply(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<impl IntoResponse, ServerError> {
    let mut cmd = TransactionCmd::new(
        payload.transaction_id,
        payload.shopper_id,
        payload.store_id,
        payload.timestamp,
    );
    for item in payload.items {
        cmd = cmd.item(LineItemInput::new(
            item.sku,
            item.name,
            item.quantity,
            item.unit_price,
            item.category,
        ));
    }

    let applied = state.engine.apply_transaction(cmd).await?;

    tracing::info!(
        transaction_id = %applied.transaction_id,
        shopper_id = %applied.shopper_id,
        stickers_earned = applied.stickers_earned,
        is_duplicate = applied.is_duplicate,
        "transaction applied"
    );

    let status = if applied.is_duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    let body = TransactionApplied {
        transaction_id: applied.transaction_id,
        shopper_id: applied.shopper_id,
        stickers_earned: applied.stickers_earned,
        new_balance: applied.new_balance,
        breakdown: Breakdown {
            raw_total: applied.raw_total,
            capped: applied.capped,
        },
        is_duplicate: applied.is_duplicate,
    };

    Ok((status, Json(body)))
}
