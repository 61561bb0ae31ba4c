// src/expense_handlers.rs
//! Extra (miscellaneous) expenses

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::models::{ExpensePayload, RecordPayload};
use crate::repositories::{ExpenseRepository, RecordRepository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiResponse, DeleteQuery, ListQuery};
use log::info;

pub async fn get_expense_records(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = ExpenseRepository
        .list(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

pub async fn get_expense_record(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    match ExpenseRepository.get_by_id(&app_state.db_pool, &id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        None => Err(ApiError::not_found(ExpenseRepository.entity_name())),
    }
}

pub async fn create_expense_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<ExpensePayload>,
) -> ApiResult<HttpResponse> {
    let input = payload.to_create_input()?;

    let created = ExpenseRepository.insert(&app_state.db_pool, &input).await?;

    info!("🧾 Created expense: {} {} [{}] ({})", created.category, created.amount, created.status, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

pub async fn update_expense_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<ExpensePayload>,
) -> ApiResult<HttpResponse> {
    let (id, input) = payload.to_update_input()?;

    let updated = ExpenseRepository.replace(&app_state.db_pool, &id, &input).await?;

    info!("🧾 Updated expense: {} [{}]", id, updated.status);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

pub async fn delete_expense_record(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = query.require_id()?;

    let deleted = ExpenseRepository.delete(&app_state.db_pool, id).await?;

    info!("🗑️ Deleted expense: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        deleted,
        "Record deleted successfully".to_string(),
    )))
}

pub async fn get_expense_summary(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let summary = ExpenseRepository.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;
    use crate::handlers::test_support::{read_json, test_app};

    #[actix_web::test]
    async fn test_expense_defaults_and_summary() {
        let (app, _state) = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/extra-expenses")
            .set_json(json!({ "date": "2024-05-03", "category": "Fuel", "amount": 2500 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = read_json(resp).await;
        assert_eq!(created["data"]["status"], "Pending");
        assert_eq!(created["data"]["description"], "");

        let req = test::TestRequest::post()
            .uri("/api/extra-expenses")
            .set_json(json!({
                "date": "2024-05-04",
                "category": "Repairs",
                "description": "Thresher belt",
                "amount": "1500.5",
                "status": "Approved"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/extra-expenses/summary").to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["totalAmount"], 4000.5);
        assert_eq!(body["data"]["totalExpenses"], 2);
        assert_eq!(body["data"]["pendingExpenses"], 1);
        assert_eq!(body["data"]["approvedExpenses"], 1);

        let req = test::TestRequest::get().uri("/api/extra-expenses?search=belt").to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["category"], "Repairs");
    }

    #[actix_web::test]
    async fn test_expense_rejects_unknown_status() {
        let (app, _state) = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/extra-expenses")
            .set_json(json!({ "date": "2024-05-03", "category": "Fuel", "amount": 10, "status": "Paid" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
