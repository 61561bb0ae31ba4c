// src/repositories/mod.rs
//! Table access for the five record kinds

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use serde::Serialize;
use crate::error::{ApiError, ApiResult};

pub mod chuira;
pub mod dhaan;
pub mod expense;
pub mod salary;
pub mod sales;

pub use chuira::ChuiraRepository;
pub use dhaan::DhaanRepository;
pub use expense::ExpenseRepository;
pub use salary::SalaryRepository;
pub use sales::SalesRepository;

/// Newest first; rowid breaks ties between rows created in the same instant.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

/// CRUD over one record table
#[async_trait]
pub trait RecordRepository: Send + Sync {
    type Record: Serialize + Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>;
    type Input: Send + Sync;

    /// Table name in the database
    fn table_name(&self) -> &'static str;

    /// Human-readable name used in messages ("Dhaan record")
    fn entity_name(&self) -> &'static str;

    /// Column expressions matched by `?search=`
    fn search_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// All rows, newest first, optionally filtered by a case-insensitive substring.
    async fn list(&self, pool: &SqlitePool, search: Option<&str>) -> ApiResult<Vec<Self::Record>> {
        let fields = self.search_fields();
        let term = search.map(str::trim).filter(|s| !s.is_empty());

        let records = match term {
            Some(term) if !fields.is_empty() => {
                let conditions = fields
                    .iter()
                    .map(|f| format!("LOWER({}) LIKE ? ESCAPE '\\'", f))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                let sql = format!(
                    "SELECT * FROM {} WHERE {} {}",
                    self.table_name(),
                    conditions,
                    NEWEST_FIRST
                );
                let pattern = like_pattern(term);

                let mut query = sqlx::query_as::<_, Self::Record>(&sql);
                for _ in fields {
                    query = query.bind(pattern.clone());
                }
                query.fetch_all(pool).await?
            }
            _ => {
                let sql = format!("SELECT * FROM {} {}", self.table_name(), NEWEST_FIRST);
                sqlx::query_as::<_, Self::Record>(&sql)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(records)
    }

    /// The `limit` newest rows.
    async fn recent(&self, pool: &SqlitePool, limit: i64) -> ApiResult<Vec<Self::Record>> {
        let sql = format!("SELECT * FROM {} {} LIMIT ?", self.table_name(), NEWEST_FIRST);
        let records = sqlx::query_as::<_, Self::Record>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(records)
    }

    async fn get_by_id(&self, pool: &SqlitePool, id: &str) -> ApiResult<Option<Self::Record>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.table_name());
        let record = sqlx::query_as::<_, Self::Record>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(record)
    }

    /// Removes the row and returns it as it was.
    async fn delete(&self, pool: &SqlitePool, id: &str) -> ApiResult<Self::Record> {
        let sql = format!("DELETE FROM {} WHERE id = ? RETURNING *", self.table_name());
        sqlx::query_as::<_, Self::Record>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(self.entity_name()))
    }

    async fn insert(&self, pool: &SqlitePool, input: &Self::Input) -> ApiResult<Self::Record>;

    /// Replaces every field of an existing row; `created_at` is kept.
    async fn replace(&self, pool: &SqlitePool, id: &str, input: &Self::Input) -> ApiResult<Self::Record>;
}

/// `%term%` with LIKE wildcards in the term escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
