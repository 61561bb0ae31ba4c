// src/sales_handlers.rs
//! Sales orders

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::models::{NextOrderId, RecordPayload, SalesPayload};
use crate::repositories::{RecordRepository, SalesRepository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiResponse, DeleteQuery, ListQuery};
use log::info;

// ==================== GET ALL SALES ====================

pub async fn get_sales_records(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = SalesRepository
        .list(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

// ==================== GET SALE BY ID ====================

pub async fn get_sales_record(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    match SalesRepository.get_by_id(&app_state.db_pool, &id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        None => Err(ApiError::not_found(SalesRepository.entity_name())),
    }
}

// ==================== CREATE SALE ====================

pub async fn create_sales_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<SalesPayload>,
) -> ApiResult<HttpResponse> {
    let input = payload.to_create_input()?;

    if SalesRepository.order_id_taken(&app_state.db_pool, input.order_id, None).await? {
        return Err(ApiError::order_id_exists(input.order_id));
    }

    let created = SalesRepository.insert(&app_state.db_pool, &input).await?;

    info!(
        "📦 Created sale #{} for {}: {} kg, NPR {} ({})",
        created.order_id, created.customer_name, created.quantity, created.total_price, created.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== UPDATE SALE ====================

pub async fn update_sales_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<SalesPayload>,
) -> ApiResult<HttpResponse> {
    let (id, input) = payload.to_update_input()?;

    if SalesRepository.order_id_taken(&app_state.db_pool, input.order_id, Some(&id)).await? {
        return Err(ApiError::order_id_exists(input.order_id));
    }

    let updated = SalesRepository.replace(&app_state.db_pool, &id, &input).await?;

    info!("📦 Updated sale #{} [{}] ({})", updated.order_id, updated.status, id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

// ==================== DELETE SALE ====================

pub async fn delete_sales_record(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = query.require_id()?;

    let deleted = SalesRepository.delete(&app_state.db_pool, id).await?;

    info!("🗑️ Deleted sale #{} ({})", deleted.order_id, id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        deleted,
        "Record deleted successfully".to_string(),
    )))
}

// ==================== SUMMARY / NEXT ORDER ====================

pub async fn get_sales_summary(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let summary = SalesRepository.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// One past the highest order number in use, or 1 when there are no sales.
pub async fn get_next_order_id(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let next_order_id = SalesRepository.next_order_id(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(NextOrderId { next_order_id })))
}
