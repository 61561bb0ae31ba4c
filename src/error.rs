// src/error.rs
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::DatabaseError(err) => write!(f, "Database Error: {}", err),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        // Internal details go to the log, the client only gets a generic message.
        let message = match self {
            ApiError::DatabaseError(err) => {
                log::error!("Database error: {}", err);
                "Failed to process request".to_string()
            }
            ApiError::InternalServerError(msg) => {
                log::error!("Internal error: {}", msg);
                "Failed to process request".to_string()
            }
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            success: false,
            message,
        };

        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::ValidationError(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error_response),
            ApiError::DatabaseError(_) => HttpResponse::InternalServerError().json(error_response),
            ApiError::InternalServerError(_) => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return ApiError::BadRequest("Record with this identifier already exists".to_string());
            }
        }
        ApiError::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::BadRequest(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn batch_id_exists(batch_id: &str) -> Self {
        ApiError::BadRequest(format!("Batch ID '{}' already exists", batch_id))
    }

    pub fn order_id_exists(order_id: i64) -> Self {
        ApiError::BadRequest(format!("Order ID {} already exists", order_id))
    }
}
