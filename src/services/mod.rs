//! User-based collaborative filtering
//!
//! Ratings flow through [`pairing`] → [`pearson`] → [`neighbors`] → [`aggregation`];
//! [`prediction`] chains them for a single (user, item) request.

pub mod aggregation;
pub mod neighbors;
pub mod pairing;
pub mod pearson;
pub mod prediction;

pub use aggregation::aggregate_prediction;
pub use neighbors::rank_neighbors;
pub use pairing::pair_histories;
pub use pearson::pearson;
pub use prediction::{predict, PredictionService};
