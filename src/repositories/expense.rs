// src/repositories/expense.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::{ApiError, ApiResult};
use crate::models::{ExpenseInput, ExpenseRecord, ExpenseStatus, ExpenseSummary};
use super::RecordRepository;

pub struct ExpenseRepository;

#[async_trait]
impl RecordRepository for ExpenseRepository {
    type Record = ExpenseRecord;
    type Input = ExpenseInput;

    fn table_name(&self) -> &'static str {
        "expense_records"
    }

    fn entity_name(&self) -> &'static str {
        "Expense record"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["category", "description", "status"]
    }

    async fn insert(&self, pool: &SqlitePool, input: &ExpenseInput) -> ApiResult<ExpenseRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expense_records
                (id, date, category, description, amount, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(&id)
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.amount)
        .bind(input.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, input: &ExpenseInput) -> ApiResult<ExpenseRecord> {
        sqlx::query_as::<_, ExpenseRecord>(
            r#"
            UPDATE expense_records
            SET date = ?, category = ?, description = ?, amount = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#
        )
        .bind(input.date)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.amount)
        .bind(input.status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }
}

impl ExpenseRepository {
    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<ExpenseSummary> {
        let (total_amount, total_expenses, pending_expenses, approved_expenses): (f64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT COALESCE(SUM(amount), 0.0),
                       COUNT(*),
                       COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
                       COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
                FROM expense_records
                "#
            )
            .bind(ExpenseStatus::Pending.as_str())
            .bind(ExpenseStatus::Approved.as_str())
            .fetch_one(pool)
            .await?;

        Ok(ExpenseSummary {
            total_amount,
            total_expenses,
            pending_expenses,
            approved_expenses,
        })
    }
}
