//! Rating store access
//!
//! The prediction core reads ratings through [`RatingSource`], a synchronous view
//! over data that is already in memory. [`RatingStore`] is the asynchronous
//! persistence boundary; it hands out a [`RatingSnapshot`] holding everything a
//! single prediction needs, so the core never goes back to the store mid-computation.

pub mod memory;
pub mod postgres;
pub mod snapshot;

pub use memory::MemoryRatingStore;
pub use postgres::{create_pool, PgRatingStore};
pub use snapshot::RatingSnapshot;

use crate::{
    error::{AppResult, PredictionError},
    models::{ItemId, Rating, Score, UserId},
};

/// Read-only view of ratings used by the prediction core
pub trait RatingSource {
    /// Every (item, score) the user rated, ordered by item id
    fn ratings_for_user(&self, user_id: UserId) -> Vec<(ItemId, Score)>;

    /// Users who rated the item, ordered by user id
    fn raters_of_item(&self, item_id: ItemId) -> Vec<UserId>;

    /// The score a user gave an item
    fn score_of(&self, user_id: UserId, item_id: ItemId) -> Result<Score, PredictionError>;
}

/// Persistence boundary for ratings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Captures the target user's ratings plus the full history of at most
    /// `max_candidates` other users who rated `item_id`, in one consistent read.
    async fn snapshot(
        &self,
        user_id: UserId,
        item_id: ItemId,
        max_candidates: usize,
    ) -> AppResult<RatingSnapshot>;

    async fn ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<Rating>>;

    async fn ratings_for_item(&self, item_id: ItemId) -> AppResult<Vec<Rating>>;

    /// Inserts the rating, or replaces the score if the pair was already rated
    async fn upsert_rating(&self, rating: Rating) -> AppResult<Rating>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
