use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, run, run_with_listener, spawn_with_listener};

mod server;
mod shoppers;
mod statistics;
mod transactions;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            Breakdown, LineItemNew, LineItemView, TransactionApplied, TransactionNew,
            TransactionView,
        };
    }

    pub mod shopper {
        pub use api_types::shopper::{ShopperDetailResponse, ShopperSummary};
    }

    pub mod stats {
        pub use api_types::stats::{StatsResponse, StoreStickers};
    }
}

pub struct ServerError(EngineError);

/// `axum::Json` with this API's error body: a structurally malformed request
/// (missing field, wrong type, invalid JSON) answers 400 `{error, details}`
/// like any other validation failure instead of axum's plain-text 422.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError(EngineError::Validation(vec![
                rejection.body_text(),
            ]))),
        }
    }
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> Error {
    match err {
        EngineError::Validation(details) => Error {
            error: "invalid input".to_string(),
            details: Some(details),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            Error {
                error: "internal server error".to_string(),
                details: None,
            }
        }
        other => Error {
            error: other.to_string(),
            details: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for_engine_error(&self.0);
        (status, Json(body_for_engine_error(self.0))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation(vec!["bad".to_string()]))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_amount_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_maps_to_500() {
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "boom".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
