// src/repositories/salary.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;
use crate::error::{ApiError, ApiResult};
use crate::models::{SalaryInput, SalaryRecord, SalarySummary};
use super::RecordRepository;

pub struct SalaryRepository;

#[async_trait]
impl RecordRepository for SalaryRepository {
    type Record = SalaryRecord;
    type Input = SalaryInput;

    fn table_name(&self) -> &'static str {
        "salary_records"
    }

    fn entity_name(&self) -> &'static str {
        "Salary record"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["employee_name"]
    }

    async fn insert(&self, pool: &SqlitePool, input: &SalaryInput) -> ApiResult<SalaryRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let record = sqlx::query_as::<_, SalaryRecord>(
            r#"
            INSERT INTO salary_records (id, employee_name, salary_amount, paid_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#
        )
        .bind(&id)
        .bind(&input.employee_name)
        .bind(input.salary_amount)
        .bind(input.paid_date)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn replace(&self, pool: &SqlitePool, id: &str, input: &SalaryInput) -> ApiResult<SalaryRecord> {
        sqlx::query_as::<_, SalaryRecord>(
            r#"
            UPDATE salary_records
            SET employee_name = ?, salary_amount = ?, paid_date = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#
        )
        .bind(&input.employee_name)
        .bind(input.salary_amount)
        .bind(input.paid_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }
}

impl SalaryRepository {
    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<SalarySummary> {
        let (total_salary, total_employees): (f64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(salary_amount), 0.0), COUNT(*) FROM salary_records"
        )
        .fetch_one(pool)
        .await?;

        let average_salary = if total_employees > 0 {
            total_salary / total_employees as f64
        } else {
            0.0
        };

        Ok(SalarySummary {
            total_salary,
            total_employees,
            average_salary,
        })
    }
}
