use std::sync::Arc;

use crate::{
    config::Config,
    db::{MemoryRatingStore, RatingStore},
    models::RatingScale,
    services::PredictionService,
};

/// Shared application state
///
/// Holds no mutable data of its own; ratings live behind the injected store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RatingStore>,
    pub predictions: PredictionService,
}

impl AppState {
    pub fn new(store: Arc<dyn RatingStore>, scale: RatingScale, max_candidates: usize) -> Self {
        let predictions = PredictionService::new(store.clone(), scale, max_candidates);
        Self { store, predictions }
    }

    pub fn from_config(store: Arc<dyn RatingStore>, config: &Config) -> Self {
        Self::new(store, config.rating_scale(), config.max_candidates)
    }

    /// State backed by an empty in-memory store on the default 1..=5 scale
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRatingStore::new()), RatingScale::default(), 500)
    }

    pub fn scale(&self) -> RatingScale {
        self.predictions.scale()
    }
}
