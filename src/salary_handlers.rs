// src/salary_handlers.rs
//! Employee salary payments

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::models::{RecordPayload, SalaryPayload};
use crate::repositories::{RecordRepository, SalaryRepository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiResponse, DeleteQuery, ListQuery};
use log::info;

pub async fn get_salary_records(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = SalaryRepository
        .list(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

pub async fn get_salary_record(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    match SalaryRepository.get_by_id(&app_state.db_pool, &id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        None => Err(ApiError::not_found(SalaryRepository.entity_name())),
    }
}

pub async fn create_salary_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<SalaryPayload>,
) -> ApiResult<HttpResponse> {
    let input = payload.to_create_input()?;

    let created = SalaryRepository.insert(&app_state.db_pool, &input).await?;

    info!("💰 Recorded salary for {} ({})", created.employee_name, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

pub async fn update_salary_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<SalaryPayload>,
) -> ApiResult<HttpResponse> {
    let (id, input) = payload.to_update_input()?;

    let updated = SalaryRepository.replace(&app_state.db_pool, &id, &input).await?;

    info!("💰 Updated salary record: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

pub async fn delete_salary_record(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = query.require_id()?;

    let deleted = SalaryRepository.delete(&app_state.db_pool, id).await?;

    info!("🗑️ Deleted salary record: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        deleted,
        "Record deleted successfully".to_string(),
    )))
}

pub async fn get_salary_summary(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let summary = SalaryRepository.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}
