use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::{ItemId, UserId};

/// Failures of the prediction pipeline
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// No neighbor with a nonzero correlation rated the item
    #[error("No similarity signal to predict item {item_id}")]
    NoSignal { item_id: ItemId },

    /// A neighbor handed to the aggregator never rated the item
    #[error("Neighbor {user_id} has no rating for item {item_id}")]
    MissingNeighborRating { user_id: UserId, item_id: ItemId },

    #[error("No rating recorded for user {user_id} and item {item_id}")]
    NotFound { user_id: UserId, item_id: ItemId },
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

const GENERIC_FAILURE: &str = "Something went wrong, please try again later";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Prediction(PredictionError::NoSignal { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Not enough data to predict a rating".to_string(),
            ),
            AppError::Prediction(_) | AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
