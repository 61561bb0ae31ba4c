// src/models/salary.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::RecordPayload;
use crate::validator::{FieldReader, FlexibleNumber};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_name: String,
    /// NPR
    pub salary_amount: f64,
    pub paid_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub employee_name: Option<String>,
    pub salary_amount: Option<FlexibleNumber>,
    pub paid_date: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SalaryInput {
    #[validate(length(max = 255, message = "Employee name cannot exceed 255 characters"))]
    pub employee_name: String,
    #[validate(range(min = 0.0, message = "Salary amount cannot be negative"))]
    pub salary_amount: f64,
    pub paid_date: DateTime<Utc>,
}

impl RecordPayload for SalaryPayload {
    type Input = SalaryInput;

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn read(&self, reader: &mut FieldReader) -> SalaryInput {
        SalaryInput {
            employee_name: reader.text("employeeName", self.employee_name.as_deref()),
            salary_amount: reader.number("salaryAmount", self.salary_amount.as_ref()),
            paid_date: reader.date("paidDate", self.paid_date.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySummary {
    pub total_salary: f64,
    pub total_employees: i64,
    pub average_salary: f64,
}
