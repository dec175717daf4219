use crate::domain::{models::availability::AvailabilityRule, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn list_rules(&self, provider_id: &str) -> Result<Vec<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>("SELECT * FROM availability_rules WHERE provider_id = $1 ORDER BY weekday, start_time")
            .bind(provider_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn replace_rules(
        &self,
        provider_id: &str,
        rules: &[AvailabilityRule],
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM availability_rules WHERE provider_id = $1")
            .bind(provider_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // Duplicate (weekday, start_time) entries within one payload collapse
        // via upsert; the later entry wins.
        for rule in rules {
            sqlx::query("INSERT INTO availability_rules (id, provider_id, weekday, start_time, end_time, active, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (provider_id, weekday, start_time) DO UPDATE SET end_time=excluded.end_time, active=excluded.active")
                .bind(&rule.id)
                .bind(provider_id)
                .bind(rule.weekday)
                .bind(rule.start_time)
                .bind(rule.end_time)
                .bind(rule.active)
                .bind(rule.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        self.list_rules(provider_id).await
    }
}
