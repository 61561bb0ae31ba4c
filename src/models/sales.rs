// src/models/sales.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use crate::models::{RecordPayload, SalesStatus};
use crate::validator::{FieldReader, FlexibleNumber};

// ==================== SALES ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_id: i64,
    pub date: DateTime<Utc>,
    pub quantity: f64,
    pub price_per_kg: f64,
    /// As supplied by the client; not checked against quantity * price_per_kg.
    pub total_price: f64,
    pub customer_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SalesPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub order_id: Option<FlexibleNumber>,
    pub date: Option<String>,
    pub quantity: Option<FlexibleNumber>,
    pub price_per_kg: Option<FlexibleNumber>,
    pub total_price: Option<FlexibleNumber>,
    pub customer_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SalesInput {
    #[validate(range(min = 1, message = "Order ID must be a positive number"))]
    pub order_id: i64,
    pub date: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "Quantity cannot be negative"))]
    pub quantity: f64,
    #[validate(range(min = 0.0, message = "Price per kg cannot be negative"))]
    pub price_per_kg: f64,
    #[validate(range(min = 0.0, message = "Total price cannot be negative"))]
    pub total_price: f64,
    #[validate(length(max = 255, message = "Customer name cannot exceed 255 characters"))]
    pub customer_name: String,
    pub status: SalesStatus,
}

impl RecordPayload for SalesPayload {
    type Input = SalesInput;

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn read(&self, reader: &mut FieldReader) -> SalesInput {
        SalesInput {
            order_id: reader.integer("orderId", self.order_id.as_ref()),
            date: reader.date("date", self.date.as_deref()),
            quantity: reader.number("quantity", self.quantity.as_ref()),
            price_per_kg: reader.number("pricePerKg", self.price_per_kg.as_ref()),
            total_price: reader.number("totalPrice", self.total_price.as_ref()),
            customer_name: reader.text("customerName", self.customer_name.as_deref()),
            status: reader.status_or("status", self.status.as_deref(), SalesStatus::Pending),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: i64,
    pub total_revenue: f64,
    pub total_quantity: f64,
    pub completed_sales: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextOrderId {
    pub next_order_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_total_price_kept_as_supplied() {
        let payload: SalesPayload = serde_json::from_str(
            r#"{"orderId": "7", "date": "2024-08-01", "quantity": 10, "pricePerKg": 50,
                "totalPrice": 450, "customerName": "Annapurna Traders"}"#,
        ).unwrap();

        let input = payload.to_create_input().unwrap();
        assert_eq!(input.order_id, 7);
        assert_eq!(input.total_price, 450.0);
        assert_eq!(input.status, SalesStatus::Pending);
    }

    #[test]
    fn test_fractional_order_id_rejected() {
        let payload: SalesPayload = serde_json::from_str(
            r#"{"orderId": 1.5, "date": "2024-08-01", "quantity": 10, "pricePerKg": 50,
                "totalPrice": 500, "customerName": "Annapurna Traders"}"#,
        ).unwrap();

        assert!(matches!(payload.to_create_input(), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_zero_order_id_rejected() {
        let payload: SalesPayload = serde_json::from_str(
            r#"{"orderId": 0, "date": "2024-08-01", "quantity": 10, "pricePerKg": 50,
                "totalPrice": 500, "customerName": "Annapurna Traders"}"#,
        ).unwrap();

        assert!(matches!(payload.to_create_input(), Err(ApiError::ValidationError(_))));
    }
}
