use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a user who rates movies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i32);

/// Identifier of a rated item (a movie)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ItemId(pub i32);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer score on a bounded rating scale
pub type Score = i32;

/// Scores two users gave to the same items, one tuple per shared item
pub type PairedRatings = Vec<(Score, Score)>;

/// A single user's score for a single item
///
/// At most one rating exists per (user, item) pair; writing again replaces the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub user_id: UserId,
    #[sqlx(rename = "movie_id")]
    #[serde(rename = "movie_id")]
    pub item_id: ItemId,
    pub score: Score,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, score: Score) -> Self {
        Self {
            user_id,
            item_id,
            score,
        }
    }
}

/// Inclusive bounds of the rating scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: Score,
    pub max: Score,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

impl RatingScale {
    pub fn new(min: Score, max: Score) -> Self {
        Self { min, max }
    }

    /// One past the top of the scale
    ///
    /// Negatively correlated neighbors contribute `complement_base() - score`,
    /// so a 5 on a 1..=5 scale counts as a 1.
    pub fn complement_base(&self) -> Score {
        self.max + 1
    }

    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

/// Pearson similarity between the target user and one neighbor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similarity {
    pub user_id: UserId,
    pub coefficient: f64,
}

/// Outcome of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Blended score, neither rounded nor clamped to the rating scale
    pub score: f64,
    pub neighbor_count: usize,
}
