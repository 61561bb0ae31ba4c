// src/chuira_handlers.rs
//! Chuira production batches

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::models::{ChuiraPayload, RecordPayload};
use crate::repositories::{ChuiraRepository, RecordRepository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiResponse, DeleteQuery, ListQuery};
use log::info;

// ==================== GET ALL BATCHES ====================

pub async fn get_chuira_records(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = ChuiraRepository
        .list(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

// ==================== GET BATCH BY ID ====================

pub async fn get_chuira_record(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    ChuiraRepository
        .get_by_id(&app_state.db_pool, &id)
        .await?
        .map(|record| HttpResponse::Ok().json(ApiResponse::success(record)))
        .ok_or_else(|| ApiError::not_found(ChuiraRepository.entity_name()))
}

// ==================== CREATE BATCH ====================

pub async fn create_chuira_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<ChuiraPayload>,
) -> ApiResult<HttpResponse> {
    let input = payload.to_create_input()?;

    if ChuiraRepository.batch_id_taken(&app_state.db_pool, &input.batch_id, None).await? {
        return Err(ApiError::batch_id_exists(&input.batch_id));
    }

    let created = ChuiraRepository.insert(&app_state.db_pool, &input).await?;

    info!("🏭 Created chuira batch: {} [{}] ({})", created.batch_id, created.status, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== UPDATE BATCH ====================

pub async fn update_chuira_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<ChuiraPayload>,
) -> ApiResult<HttpResponse> {
    let (id, input) = payload.to_update_input()?;

    if ChuiraRepository.batch_id_taken(&app_state.db_pool, &input.batch_id, Some(&id)).await? {
        return Err(ApiError::batch_id_exists(&input.batch_id));
    }

    let updated = ChuiraRepository.replace(&app_state.db_pool, &id, &input).await?;

    info!("🏭 Updated chuira batch: {} ({})", updated.batch_id, id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

// ==================== DELETE BATCH ====================

pub async fn delete_chuira_record(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = query.require_id()?;

    let deleted = ChuiraRepository.delete(&app_state.db_pool, id).await?;

    info!("🗑️ Deleted chuira batch: {} ({})", deleted.batch_id, id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        deleted,
        "Record deleted successfully".to_string(),
    )))
}

// ==================== SUMMARY ====================

pub async fn get_chuira_summary(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let summary = ChuiraRepository.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}
