use std::sync::Arc;
use std::time::Instant;

use crate::{
    db::{RatingSource, RatingStore},
    error::{AppError, AppResult, PredictionError},
    models::{ItemId, Prediction, RatingScale, UserId},
};

use super::{aggregation::aggregate_prediction, neighbors::rank_neighbors};

/// Predicts how `user_id` would rate `item_id`
///
/// Every other rater of the item is a candidate neighbor. Pure and repeatable:
/// the same source and inputs always give the same result.
pub fn predict<S>(
    source: &S,
    user_id: UserId,
    item_id: ItemId,
    scale: RatingScale,
) -> Result<Prediction, PredictionError>
where
    S: RatingSource + ?Sized,
{
    let candidates = source.raters_of_item(item_id);
    let neighbors = rank_neighbors(source, user_id, &candidates);
    let score = aggregate_prediction(source, item_id, &neighbors, scale)?;

    Ok(Prediction {
        user_id,
        item_id,
        score,
        neighbor_count: neighbors.len(),
    })
}

/// Runs predictions against a rating store
///
/// Each call captures its own snapshot of the ratings it needs, then computes on
/// that snapshot without touching the store again.
#[derive(Clone)]
pub struct PredictionService {
    store: Arc<dyn RatingStore>,
    scale: RatingScale,
    max_candidates: usize,
}

impl PredictionService {
    pub fn new(store: Arc<dyn RatingStore>, scale: RatingScale, max_candidates: usize) -> Self {
        Self {
            store,
            scale,
            max_candidates,
        }
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    pub async fn predict(&self, user_id: UserId, item_id: ItemId) -> AppResult<Prediction> {
        let start = Instant::now();

        let snapshot = self
            .store
            .snapshot(user_id, item_id, self.max_candidates)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            item_id = %item_id,
            store = self.store.name(),
            users = snapshot.user_count(),
            ratings = snapshot.len(),
            "Rating snapshot captured"
        );

        let scale = self.scale;
        let result =
            tokio::task::spawn_blocking(move || predict(&snapshot, user_id, item_id, scale))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;

        let elapsed_ms = start.elapsed().as_millis();
        match result {
            Ok(prediction) => {
                tracing::info!(
                    user_id = %user_id,
                    item_id = %item_id,
                    score = prediction.score,
                    neighbors = prediction.neighbor_count,
                    elapsed_ms,
                    "Prediction computed"
                );
                Ok(prediction)
            }
            Err(e @ PredictionError::NoSignal { .. }) => {
                tracing::info!(
                    user_id = %user_id,
                    item_id = %item_id,
                    elapsed_ms,
                    "Not enough data for prediction"
                );
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    item_id = %item_id,
                    error = %e,
                    "Prediction failed"
                );
                Err(e.into())
            }
        }
    }
}
