use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::AppResult,
    models::{ItemId, Rating, UserId},
};

use super::{RatingSnapshot, RatingStore};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Rating store backed by the `ratings` table
#[derive(Clone)]
pub struct PgRatingStore {
    pool: PgPool,
}

impl PgRatingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingStore for PgRatingStore {
    async fn snapshot(
        &self,
        user_id: UserId,
        item_id: ItemId,
        max_candidates: usize,
    ) -> AppResult<RatingSnapshot> {
        // Fetch one extra row to notice truncation
        let fetch_limit = i64::try_from(max_candidates.saturating_add(1)).unwrap_or(i64::MAX);

        // Both reads see the same data even while ratings are being written
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let mut candidates: Vec<UserId> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM ratings
            WHERE movie_id = $1 AND user_id <> $2
            ORDER BY user_id
            LIMIT $3
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(fetch_limit)
        .fetch_all(&mut *tx)
        .await?;

        if candidates.len() > max_candidates {
            tracing::warn!(
                item_id = %item_id,
                max_candidates,
                "Candidate set truncated"
            );
            candidates.truncate(max_candidates);
        }

        let user_ids: Vec<i32> = std::iter::once(user_id)
            .chain(candidates)
            .map(|id| id.0)
            .collect();

        let rows: Vec<Rating> = sqlx::query_as(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE user_id = ANY($1)
            ORDER BY user_id, movie_id
            "#,
        )
        .bind(&user_ids[..])
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            item_id = %item_id,
            users = user_ids.len(),
            ratings = rows.len(),
            "Loaded rating snapshot"
        );

        Ok(rows.into_iter().collect())
    }

    async fn ratings_for_user(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        let rows = sqlx::query_as(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE user_id = $1
            ORDER BY movie_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ratings_for_item(&self, item_id: ItemId) -> AppResult<Vec<Rating>> {
        let rows = sqlx::query_as(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE movie_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_rating(&self, rating: Rating) -> AppResult<Rating> {
        let stored = sqlx::query_as(
            r#"
            INSERT INTO ratings (user_id, movie_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET score = EXCLUDED.score
            RETURNING user_id, movie_id, score
            "#,
        )
        .bind(rating.user_id)
        .bind(rating.item_id)
        .bind(rating.score)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
