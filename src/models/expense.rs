// src/models/expense.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::{ExpenseStatus, RecordPayload};
use crate::validator::{FieldReader, FlexibleNumber};

// ==================== EXTRA EXPENSE ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<FlexibleNumber>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct ExpenseInput {
    pub date: DateTime<Utc>,
    #[validate(length(max = 255, message = "Category cannot exceed 255 characters"))]
    pub category: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
    pub status: ExpenseStatus,
}

impl RecordPayload for ExpensePayload {
    type Input = ExpenseInput;

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn read(&self, reader: &mut FieldReader) -> ExpenseInput {
        ExpenseInput {
            date: reader.date("date", self.date.as_deref()),
            category: reader.text("category", self.category.as_deref()),
            description: reader.optional_text(self.description.as_deref()),
            amount: reader.number("amount", self.amount.as_ref()),
            status: reader.status_or("status", self.status.as_deref(), ExpenseStatus::Pending),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total_amount: f64,
    pub total_expenses: i64,
    pub pending_expenses: i64,
    pub approved_expenses: i64,
}
