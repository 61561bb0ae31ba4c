// src/repositories/chuira.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::{ApiError, ApiResult};
use crate::models::{ChuiraInput, ChuiraRecord, ChuiraStatus, ChuiraSummary};
use super::RecordRepository;

pub struct ChuiraRepository;

#[async_trait]
impl RecordRepository for ChuiraRepository {
    type Record = ChuiraRecord;
    type Input = ChuiraInput;

    fn table_name(&self) -> &'static str {
        "chuira_records"
    }

    fn entity_name(&self) -> &'static str {
        "Chuira batch"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["batch_id", "operator_name", "status"]
    }

    async fn insert(&self, pool: &SqlitePool, input: &ChuiraInput) -> ApiResult<ChuiraRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, ChuiraRecord>(
            r#"
            INSERT INTO chuira_records
                (id, batch_id, produced, bhuss, operator_name, status, date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(&id)
        .bind(&input.batch_id)
        .bind(input.produced)
        .bind(input.bhuss)
        .bind(&input.operator_name)
        .bind(input.status.as_str())
        .bind(input.date)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, input: &ChuiraInput) -> ApiResult<ChuiraRecord> {
        sqlx::query_as::<_, ChuiraRecord>(
            r#"
            UPDATE chuira_records
            SET batch_id = ?, produced = ?, bhuss = ?, operator_name = ?, status = ?, date = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#
        )
        .bind(&input.batch_id)
        .bind(input.produced)
        .bind(input.bhuss)
        .bind(&input.operator_name)
        .bind(input.status.as_str())
        .bind(input.date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }
}

impl ChuiraRepository {
    /// Whether another row (other than `exclude_id`) already uses `batch_id`.
    pub async fn batch_id_taken(
        &self,
        pool: &SqlitePool,
        batch_id: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<bool> {
        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM chuira_records WHERE batch_id = ? AND id != COALESCE(?, '')"
        )
        .bind(batch_id)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;

        Ok(existing.is_some())
    }

    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<ChuiraSummary> {
        let (total_produced, total_bhuss, total_batches, completed_batches): (f64, f64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COALESCE(SUM(produced), 0.0),
                       COALESCE(SUM(bhuss), 0.0),
                       COUNT(*),
                       COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
                FROM chuira_records
                "#
            )
            .bind(ChuiraStatus::Completed.as_str())
            .fetch_one(pool)
            .await?;

        Ok(ChuiraSummary {
            total_produced,
            total_bhuss,
            total_batches,
            completed_batches,
        })
    }
}
