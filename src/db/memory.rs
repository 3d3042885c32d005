use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{ItemId, Rating, UserId},
};

use super::{RatingSnapshot, RatingSource, RatingStore};

/// Rating store kept in process memory
///
/// Used when no database is configured, and by the integration tests.
#[derive(Clone, Default)]
pub struct MemoryRatingStore {
    inner: Arc<RwLock<RatingSnapshot>>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given ratings
    pub fn with_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ratings.into_iter().collect())),
        }
    }
}

#[async_trait::async_trait]
impl RatingStore for MemoryRatingStore {
    async fn snapshot(
        &self,
        user_id: UserId,
        item_id: ItemId,
        max_candidates: usize,
    ) -> AppResult<RatingSnapshot> {
        let inner = self.inner.read().await;

        let raters: Vec<UserId> = inner
            .raters_of_item(item_id)
            .into_iter()
            .filter(|&rater| rater != user_id)
            .collect();

        if raters.len() > max_candidates {
            tracing::warn!(
                item_id = %item_id,
                raters = raters.len(),
                max_candidates,
                "Candidate set truncated"
            );
        }

        let selected: Vec<UserId> = std::iter::once(user_id)
            .chain(raters.into_iter().take(max_candidates))
            .collect();

        Ok(inner.subset(&selected))
    }

    async fn ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        Ok(self.inner.read().await.user_ratings(user_id))
    }

    async fn ratings_for_item(&self, item_id: ItemId) -> AppResult<Vec<Rating>> {
        Ok(self.inner.read().await.item_ratings(item_id))
    }

    async fn upsert_rating(&self, rating: Rating) -> AppResult<Rating> {
        let mut inner = self.inner.write().await;
        if let Some(previous) = inner.upsert(rating) {
            tracing::debug!(
                user_id = %rating.user_id,
                item_id = %rating.item_id,
                previous,
                score = rating.score,
                "Rating updated"
            );
        }
        Ok(rating)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryRatingStore {
        MemoryRatingStore::with_ratings(vec![
            Rating::new(UserId(1), ItemId(10), 4),
            Rating::new(UserId(1), ItemId(20), 3),
            Rating::new(UserId(2), ItemId(10), 5),
            Rating::new(UserId(2), ItemId(20), 1),
            Rating::new(UserId(3), ItemId(10), 2),
            Rating::new(UserId(4), ItemId(20), 2),
        ])
    }

    #[tokio::test]
    async fn test_snapshot_holds_target_and_raters() {
        let snapshot = store().snapshot(UserId(1), ItemId(10), 10).await.unwrap();

        assert_eq!(
            snapshot.raters_of_item(ItemId(10)),
            vec![UserId(1), UserId(2), UserId(3)]
        );
        // Full history of each rater, but nobody who skipped the item
        assert_eq!(snapshot.ratings_for_user(UserId(2)).len(), 2);
        assert!(snapshot.ratings_for_user(UserId(4)).is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_bounds_candidates() {
        let snapshot = store().snapshot(UserId(1), ItemId(10), 1).await.unwrap();

        assert_eq!(
            snapshot.raters_of_item(ItemId(10)),
            vec![UserId(1), UserId(2)]
        );
    }

    #[tokio::test]
    async fn test_snapshot_for_user_without_ratings() {
        let snapshot = store().snapshot(UserId(99), ItemId(10), 1).await.unwrap();

        assert!(snapshot.ratings_for_user(UserId(99)).is_empty());
        assert_eq!(snapshot.raters_of_item(ItemId(10)), vec![UserId(1)]);
    }

    #[tokio::test]
    async fn test_upsert_has_update_semantics() {
        let store = store();
        store
            .upsert_rating(Rating::new(UserId(3), ItemId(10), 5))
            .await
            .unwrap();

        let ratings = store.ratings_for_item(ItemId(10)).await.unwrap();
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[2], Rating::new(UserId(3), ItemId(10), 5));
    }

    #[test]
    fn test_ratings_for_user_blocking() {
        let ratings = tokio_test::block_on(store().ratings_for_user(UserId(1))).unwrap();
        assert_eq!(
            ratings,
            vec![
                Rating::new(UserId(1), ItemId(10), 4),
                Rating::new(UserId(1), ItemId(20), 3),
            ]
        );
    }
}
