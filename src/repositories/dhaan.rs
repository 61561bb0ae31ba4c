// src/repositories/dhaan.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::{ApiError, ApiResult};
use crate::models::{DhaanInput, DhaanRecord, DhaanSummary};
use super::RecordRepository;

pub struct DhaanRepository;

#[async_trait]
impl RecordRepository for DhaanRepository {
    type Record = DhaanRecord;
    type Input = DhaanInput;

    fn table_name(&self) -> &'static str {
        "dhaan_records"
    }

    fn entity_name(&self) -> &'static str {
        "Dhaan record"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["farmer", "location"]
    }

    async fn insert(&self, pool: &SqlitePool, input: &DhaanInput) -> ApiResult<DhaanRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, DhaanRecord>(
            r#"
            INSERT INTO dhaan_records (id, quantity, farmer, location, date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(&id)
        .bind(input.quantity)
        .bind(&input.farmer)
        .bind(&input.location)
        .bind(input.date)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, input: &DhaanInput) -> ApiResult<DhaanRecord> {
        sqlx::query_as::<_, DhaanRecord>(
            r#"
            UPDATE dhaan_records
            SET quantity = ?, farmer = ?, location = ?, date = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#
        )
        .bind(input.quantity)
        .bind(&input.farmer)
        .bind(&input.location)
        .bind(input.date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }
}

impl DhaanRepository {
    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<DhaanSummary> {
        let (total_quantity, total_records): (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0.0), COUNT(*) FROM dhaan_records"
        )
        .fetch_one(pool)
        .await?;

        let average_quantity = if total_records > 0 {
            total_quantity / total_records as f64
        } else {
            0.0
        };

        Ok(DhaanSummary {
            total_quantity,
            total_records,
            average_quantity,
        })
    }
}
