use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::PredictionError,
    models::{ItemId, Rating, Score, UserId},
};

use super::RatingSource;

/// In-memory set of ratings indexed by user and by item
///
/// Holds at most one score per (user, item) pair. Used both as the backing data of
/// the in-memory store and as the immutable read set of a single prediction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSnapshot {
    by_user: BTreeMap<UserId, BTreeMap<ItemId, Score>>,
    by_item: BTreeMap<ItemId, BTreeSet<UserId>>,
}

impl RatingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rating, replacing any earlier score for the same pair
    ///
    /// Returns the replaced score, if any.
    pub fn upsert(&mut self, rating: Rating) -> Option<Score> {
        self.by_item
            .entry(rating.item_id)
            .or_default()
            .insert(rating.user_id);
        self.by_user
            .entry(rating.user_id)
            .or_default()
            .insert(rating.item_id, rating.score)
    }

    /// Number of ratings held
    pub fn len(&self) -> usize {
        self.by_user.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Every rating of one user, ordered by item id
    pub fn user_ratings(&self, user_id: UserId) -> Vec<Rating> {
        self.by_user
            .get(&user_id)
            .map(|items| {
                items
                    .iter()
                    .map(|(&item_id, &score)| Rating::new(user_id, item_id, score))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every rating of one item, ordered by user id
    pub fn item_ratings(&self, item_id: ItemId) -> Vec<Rating> {
        self.raters_of_item(item_id)
            .into_iter()
            .filter_map(|user_id| {
                self.by_user
                    .get(&user_id)
                    .and_then(|items| items.get(&item_id))
                    .map(|&score| Rating::new(user_id, item_id, score))
            })
            .collect()
    }

    /// Copies the full history of the given users into a new snapshot
    pub fn subset<'a>(&self, users: impl IntoIterator<Item = &'a UserId>) -> Self {
        users
            .into_iter()
            .flat_map(|&user_id| self.user_ratings(user_id))
            .collect()
    }
}

impl FromIterator<Rating> for RatingSnapshot {
    fn from_iter<I: IntoIterator<Item = Rating>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for rating in iter {
            snapshot.upsert(rating);
        }
        snapshot
    }
}

impl RatingSource for RatingSnapshot {
    fn ratings_for_user(&self, user_id: UserId) -> Vec<(ItemId, Score)> {
        self.by_user
            .get(&user_id)
            .map(|items| items.iter().map(|(&item, &score)| (item, score)).collect())
            .unwrap_or_default()
    }

    fn raters_of_item(&self, item_id: ItemId) -> Vec<UserId> {
        self.by_item
            .get(&item_id)
            .map(|users| users.iter().copied().collect())
            .unwrap_or_default()
    }

    fn score_of(&self, user_id: UserId, item_id: ItemId) -> Result<Score, PredictionError> {
        self.by_user
            .get(&user_id)
            .and_then(|items| items.get(&item_id))
            .copied()
            .ok_or(PredictionError::NotFound { user_id, item_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RatingSnapshot {
        vec![
            Rating::new(UserId(1), ItemId(10), 4),
            Rating::new(UserId(1), ItemId(20), 2),
            Rating::new(UserId(2), ItemId(10), 5),
            Rating::new(UserId(3), ItemId(30), 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_upsert_replaces_existing_score() {
        let mut snapshot = sample();
        let previous = snapshot.upsert(Rating::new(UserId(1), ItemId(10), 1));

        assert_eq!(previous, Some(4));
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.score_of(UserId(1), ItemId(10)), Ok(1));
        assert_eq!(snapshot.raters_of_item(ItemId(10)), vec![UserId(1), UserId(2)]);
    }

    #[test]
    fn test_upsert_new_pair() {
        let mut snapshot = sample();
        assert_eq!(snapshot.upsert(Rating::new(UserId(3), ItemId(10), 3)), None);
        assert_eq!(snapshot.len(), 5);
        assert_eq!(
            snapshot.raters_of_item(ItemId(10)),
            vec![UserId(1), UserId(2), UserId(3)]
        );
    }

    #[test]
    fn test_ratings_for_user_ordered_by_item() {
        let snapshot = sample();
        assert_eq!(
            snapshot.ratings_for_user(UserId(1)),
            vec![(ItemId(10), 4), (ItemId(20), 2)]
        );
        assert!(snapshot.ratings_for_user(UserId(99)).is_empty());
    }

    #[test]
    fn test_score_of_missing() {
        let snapshot = sample();
        assert_eq!(
            snapshot.score_of(UserId(3), ItemId(10)),
            Err(PredictionError::NotFound {
                user_id: UserId(3),
                item_id: ItemId(10),
            })
        );
    }

    #[test]
    fn test_item_ratings() {
        let snapshot = sample();
        assert_eq!(
            snapshot.item_ratings(ItemId(10)),
            vec![
                Rating::new(UserId(1), ItemId(10), 4),
                Rating::new(UserId(2), ItemId(10), 5),
            ]
        );
    }

    #[test]
    fn test_subset_keeps_full_history() {
        let snapshot = sample();
        let subset = snapshot.subset(&[UserId(1)]);

        assert_eq!(subset.user_count(), 1);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.raters_of_item(ItemId(10)), vec![UserId(1)]);
        assert!(subset.raters_of_item(ItemId(30)).is_empty());
    }
}
