// src/repositories/sales.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::{ApiError, ApiResult};
use crate::models::{SalesInput, SalesRecord, SalesStatus, SalesSummary};
use crate::validator::MAX_EXACT_INTEGER;
use super::RecordRepository;

pub struct SalesRepository;

#[async_trait]
impl RecordRepository for SalesRepository {
    type Record = SalesRecord;
    type Input = SalesInput;

    fn table_name(&self) -> &'static str {
        "sales_records"
    }

    fn entity_name(&self) -> &'static str {
        "Sales record"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["CAST(order_id AS TEXT)", "customer_name", "status"]
    }

    async fn insert(&self, pool: &SqlitePool, input: &SalesInput) -> ApiResult<SalesRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, SalesRecord>(
            r#"
            INSERT INTO sales_records
                (id, order_id, date, quantity, price_per_kg, total_price, customer_name, status,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(&id)
        .bind(input.order_id)
        .bind(input.date)
        .bind(input.quantity)
        .bind(input.price_per_kg)
        .bind(input.total_price)
        .bind(&input.customer_name)
        .bind(input.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, input: &SalesInput) -> ApiResult<SalesRecord> {
        sqlx::query_as::<_, SalesRecord>(
            r#"
            UPDATE sales_records
            SET order_id = ?, date = ?, quantity = ?, price_per_kg = ?, total_price = ?,
                customer_name = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#
        )
        .bind(input.order_id)
        .bind(input.date)
        .bind(input.quantity)
        .bind(input.price_per_kg)
        .bind(input.total_price)
        .bind(&input.customer_name)
        .bind(input.status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }
}

impl SalesRepository {
    /// Whether another row (other than `exclude_id`) already uses `order_id`.
    pub async fn order_id_taken(
        &self,
        pool: &SqlitePool,
        order_id: i64,
        exclude_id: Option<&str>,
    ) -> ApiResult<bool> {
        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM sales_records WHERE order_id = ? AND id != COALESCE(?, '')"
        )
        .bind(order_id)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;

        Ok(existing.is_some())
    }

    pub async fn next_order_id(&self, pool: &SqlitePool) -> ApiResult<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(order_id) FROM sales_records")
            .fetch_one(pool)
            .await?;

        max.unwrap_or(0)
            .checked_add(1)
            .filter(|next| *next <= MAX_EXACT_INTEGER)
            .ok_or_else(|| ApiError::InternalServerError("Order ID sequence exhausted".to_string()))
    }

    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<SalesSummary> {
        let (total_sales, total_revenue, total_quantity, completed_sales): (i64, f64, f64, i64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(total_price), 0.0),
                       COALESCE(SUM(quantity), 0.0),
                       COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
                FROM sales_records
                "#
            )
            .bind(SalesStatus::Completed.as_str())
            .fetch_one(pool)
            .await?;

        Ok(SalesSummary {
            total_sales,
            total_revenue,
            total_quantity,
            completed_sales,
        })
    }
}
