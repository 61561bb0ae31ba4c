// src/dhaan_handlers.rs
//! Paddy (dhaan) collection records

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::AppState;
use crate::models::{DhaanPayload, DhaanSummary, RecordPayload};
use crate::repositories::{DhaanRepository, RecordRepository};
use crate::error::{ApiError, ApiResult};
use crate::handlers::{ApiResponse, DeleteQuery, ListQuery};
use log::info;

// ==================== GET ALL DHAAN RECORDS ====================

pub async fn get_dhaan_records(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let records = DhaanRepository
        .list(&app_state.db_pool, query.search.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

// ==================== GET DHAAN RECORD BY ID ====================

pub async fn get_dhaan_record(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    match DhaanRepository.get_by_id(&app_state.db_pool, &id).await? {
        Some(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(record))),
        None => Err(ApiError::not_found(DhaanRepository.entity_name())),
    }
}

// ==================== CREATE DHAAN RECORD ====================

pub async fn create_dhaan_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<DhaanPayload>,
) -> ApiResult<HttpResponse> {
    let input = payload.to_create_input()?;

    let created = DhaanRepository.insert(&app_state.db_pool, &input).await?;

    info!("🌾 Created dhaan record: {} kg from {} ({})", created.quantity, created.farmer, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== UPDATE DHAAN RECORD ====================

pub async fn update_dhaan_record(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<DhaanPayload>,
) -> ApiResult<HttpResponse> {
    let (id, input) = payload.to_update_input()?;

    let updated = DhaanRepository.replace(&app_state.db_pool, &id, &input).await?;

    info!("🌾 Updated dhaan record: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

// ==================== DELETE DHAAN RECORD ====================

pub async fn delete_dhaan_record(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DeleteQuery>,
) -> ApiResult<HttpResponse> {
    let id = query.require_id()?;

    let deleted = DhaanRepository.delete(&app_state.db_pool, id).await?;

    info!("🗑️ Deleted dhaan record: {}", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        deleted,
        "Record deleted successfully".to_string(),
    )))
}

// ==================== SUMMARY ====================

pub async fn get_dhaan_summary(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let summary: DhaanSummary = DhaanRepository.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;
    use crate::handlers::test_support::{read_json, test_app};

    #[actix_web::test]
    async fn test_create_list_and_search() {
        let (app, _state) = test_app!();

        for (farmer, location, quantity) in [("Ram", "Jhapa", json!(100)), ("Sita", "Morang", json!("50.5"))] {
            let req = test::TestRequest::post()
                .uri("/api/dhaan-records")
                .set_json(json!({
                    "quantity": quantity,
                    "farmer": farmer,
                    "location": location,
                    "date": "2024-05-01"
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/dhaan-records").to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        // newest first
        assert_eq!(records[0]["farmer"], "Sita");
        assert_eq!(records[0]["quantity"], 50.5);
        assert!(records[0]["_id"].is_string());
        assert!(records[0]["createdAt"].is_string());

        let req = test::TestRequest::get().uri("/api/dhaan-records?search=jha").to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["farmer"], "Ram");
    }

    #[actix_web::test]
    async fn test_create_with_missing_fields_is_rejected() {
        let (app, _state) = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/dhaan-records")
            .set_json(json!({ "quantity": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing required fields: farmer, location");
    }

    #[actix_web::test]
    async fn test_update_get_delete_and_summary() {
        let (app, _state) = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/dhaan-records")
            .set_json(json!({ "quantity": 40, "farmer": "Hari", "location": "Ilam" }))
            .to_request();
        let created = read_json(test::call_service(&app, req).await).await;
        let id = created["data"]["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri("/api/dhaan-records")
            .set_json(json!({
                "_id": id,
                "quantity": 60,
                "farmer": "Hari",
                "location": "Ilam",
                "date": "2024-06-10"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&format!("/api/dhaan-records/{}", id)).to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["quantity"], 60.0);

        let req = test::TestRequest::get().uri("/api/dhaan-records/summary").to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["totalQuantity"], 60.0);
        assert_eq!(body["data"]["totalRecords"], 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/dhaan-records?id={}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["_id"], id.as_str());

        let req = test::TestRequest::get().uri(&format!("/api/dhaan-records/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
