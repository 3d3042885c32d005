use serde::Deserialize;

use crate::models::{RatingScale, Score};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL; the in-memory store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lowest score on the rating scale
    #[serde(default = "default_rating_scale_min")]
    pub rating_scale_min: Score,

    /// Highest score on the rating scale
    #[serde(default = "default_rating_scale_max")]
    pub rating_scale_max: Score,

    /// Upper bound on other raters loaded for a single prediction
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_rating_scale_min() -> Score {
    1
}

fn default_rating_scale_max() -> Score {
    5
}

fn default_max_candidates() -> usize {
    500
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.rating_scale_min >= self.rating_scale_max {
            anyhow::bail!(
                "Invalid rating scale: min {} must be below max {}",
                self.rating_scale_min,
                self.rating_scale_max
            );
        }
        if self.max_candidates == 0 {
            anyhow::bail!("MAX_CANDIDATES must be at least 1");
        }
        Ok(())
    }

    pub fn rating_scale(&self) -> RatingScale {
        RatingScale::new(self.rating_scale_min, self.rating_scale_max)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
