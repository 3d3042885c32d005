use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ItemId, Prediction, Rating, Score, UserId},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SetRatingRequest {
    pub score: Score,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub user_id: UserId,
    pub movie_id: ItemId,
    pub predicted_score: f64,
    pub neighbor_count: usize,
    pub computed_at: DateTime<Utc>,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            user_id: prediction.user_id,
            movie_id: prediction.item_id,
            predicted_score: prediction.score,
            neighbor_count: prediction.neighbor_count,
            computed_at: Utc::now(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Predict how a user would rate a movie
pub async fn predict_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> AppResult<Json<PredictionResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        movie_id,
        "Processing prediction request"
    );

    let prediction = state
        .predictions
        .predict(UserId(user_id), ItemId(movie_id))
        .await?;

    Ok(Json(prediction.into()))
}

/// List every rating a user has given
///
/// Users and movies only exist through their ratings, so an empty list is a 404.
pub async fn get_user_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.store.ratings_for_user(UserId(user_id)).await?;
    if ratings.is_empty() {
        return Err(AppError::NotFound(format!("User {} has no ratings", user_id)));
    }
    Ok(Json(ratings))
}

/// List every rating a movie has received
pub async fn get_movie_ratings(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.store.ratings_for_item(ItemId(movie_id)).await?;
    if ratings.is_empty() {
        return Err(AppError::NotFound(format!(
            "Movie {} has no ratings",
            movie_id
        )));
    }
    Ok(Json(ratings))
}

/// Rate a movie, replacing any earlier score by the same user
pub async fn set_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    Json(request): Json<SetRatingRequest>,
) -> AppResult<Json<Rating>> {
    let scale = state.scale();
    if !scale.contains(request.score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            scale.min, scale.max
        )));
    }

    let rating = state
        .store
        .upsert_rating(Rating::new(UserId(user_id), ItemId(movie_id), request.score))
        .await?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        movie_id,
        score = rating.score,
        "Rating saved"
    );

    Ok(Json(rating))
}
