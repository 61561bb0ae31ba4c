// src/models/chuira.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::{ChuiraStatus, RecordPayload};
use crate::validator::{FieldReader, FlexibleNumber};

// ==================== CHUIRA BATCH ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChuiraRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub batch_id: String,
    pub produced: f64,
    pub bhuss: f64,
    pub operator_name: String,
    pub status: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChuiraPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub batch_id: Option<String>,
    pub produced: Option<FlexibleNumber>,
    pub bhuss: Option<FlexibleNumber>,
    pub operator_name: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct ChuiraInput {
    #[validate(length(max = 100, message = "Batch ID cannot exceed 100 characters"))]
    pub batch_id: String,
    #[validate(range(min = 0.0, message = "Produced quantity cannot be negative"))]
    pub produced: f64,
    #[validate(range(min = 0.0, message = "Bhuss quantity cannot be negative"))]
    pub bhuss: f64,
    #[validate(length(max = 255, message = "Operator name cannot exceed 255 characters"))]
    pub operator_name: String,
    pub status: ChuiraStatus,
    pub date: DateTime<Utc>,
}

impl RecordPayload for ChuiraPayload {
    type Input = ChuiraInput;

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn read(&self, reader: &mut FieldReader) -> ChuiraInput {
        ChuiraInput {
            batch_id: reader.text("batchId", self.batch_id.as_deref()),
            produced: reader.number("produced", self.produced.as_ref()),
            bhuss: reader.number("bhuss", self.bhuss.as_ref()),
            operator_name: reader.text("operatorName", self.operator_name.as_deref()),
            status: reader
                .status("status", self.status.as_deref())
                .unwrap_or_default(),
            date: reader.date("date", self.date.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChuiraSummary {
    pub total_produced: f64,
    pub total_bhuss: f64,
    pub total_batches: i64,
    pub completed_batches: i64,
}
