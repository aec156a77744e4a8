//! Postgres-backed store: one row per user in `user_configs`.

use sqlx::PgPool;
use tracing::debug;

use super::{ConfigStore, StoreError, UserId};
use crate::grid::Configuration;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConfigStore for PgStore {
    async fn load(
        &self,
        user: &UserId,
        default: &Configuration,
    ) -> Result<Configuration, StoreError> {
        let payload = default.encode()?;
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query(
            "INSERT INTO user_configs (user_id, color_config) VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user.as_str())
        .bind(&payload)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let (stored,) = sqlx::query_as::<_, (String,)>(
            "SELECT color_config FROM user_configs WHERE user_id = $1",
        )
            .bind(user.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        if created > 0 {
            debug!(%user, "stored default configuration");
        }
        Ok(Configuration::decode(&stored, &default.shape())?)
    }

    async fn save(&self, user: &UserId, config: &Configuration) -> Result<(), StoreError> {
        let payload = config.encode()?;
        sqlx::query(
            "INSERT INTO user_configs (user_id, color_config) VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET color_config = EXCLUDED.color_config, updated_at = now()",
        )
        .bind(user.as_str())
        .bind(&payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
