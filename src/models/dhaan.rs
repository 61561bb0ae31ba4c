// src/models/dhaan.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::RecordPayload;
use crate::validator::{FieldReader, FlexibleNumber};

// ==================== DHAAN COLLECTION ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DhaanRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Kilograms collected
    pub quantity: f64,
    pub farmer: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DhaanPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub quantity: Option<FlexibleNumber>,
    pub farmer: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct DhaanInput {
    #[validate(range(min = 0.0, message = "Quantity cannot be negative"))]
    pub quantity: f64,
    #[validate(length(max = 255, message = "Farmer name cannot exceed 255 characters"))]
    pub farmer: String,
    #[validate(length(max = 255, message = "Location cannot exceed 255 characters"))]
    pub location: String,
    pub date: DateTime<Utc>,
}

impl RecordPayload for DhaanPayload {
    type Input = DhaanInput;

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn read(&self, reader: &mut FieldReader) -> DhaanInput {
        DhaanInput {
            quantity: reader.number("quantity", self.quantity.as_ref()),
            farmer: reader.text("farmer", self.farmer.as_deref()),
            location: reader.text("location", self.location.as_deref()),
            // Collection date defaults to the moment of entry
            date: reader.date_or("date", self.date.as_deref(), Utc::now()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DhaanSummary {
    pub total_quantity: f64,
    pub total_records: i64,
    pub average_quantity: f64,
}
