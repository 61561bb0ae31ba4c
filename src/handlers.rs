// src/handlers.rs
use actix_web::{error::InternalError, web, HttpRequest, HttpResponse};
use serde::{Serialize, Deserialize};
use crate::error::{ApiError, ApiResult};

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

/// `GET {base}?search=`
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// `DELETE {base}?id=`
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

impl DeleteQuery {
    pub fn require_id(&self) -> ApiResult<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request("Record ID is required"))
    }
}

// ==================== EXTRACTOR ERRORS ====================

pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid JSON body: {}", err);
    InternalError::from_response(err, ApiError::BadRequest(message).into_response()).into()
}

pub fn query_error_handler(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid query string: {}", err);
    InternalError::from_response(err, ApiError::BadRequest(message).into_response()).into()
}

impl ApiError {
    fn into_response(self) -> HttpResponse {
        actix_web::ResponseError::error_response(&self)
    }
}

// ==================== ROUTES ====================

/// Every `/api` route plus the JSON/query extractor settings, with request
/// bodies capped at `max_request_size` bytes.
pub fn configure_api(max_request_size: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(max_request_size)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
        api_routes(cfg);
    }
}

// /summary and /next-order-id are registered ahead of /{id}
fn api_routes(cfg: &mut web::ServiceConfig) {
    use crate::{chuira_handlers, dashboard, dhaan_handlers, expense_handlers, monitoring, salary_handlers, sales_handlers};

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(monitoring::database_check))
            .route("/dashboard", web::get().to(dashboard::get_dashboard))
            .service(
                web::scope("/dhaan-records")
                    .route("", web::get().to(dhaan_handlers::get_dhaan_records))
                    .route("", web::post().to(dhaan_handlers::create_dhaan_record))
                    .route("", web::put().to(dhaan_handlers::update_dhaan_record))
                    .route("", web::delete().to(dhaan_handlers::delete_dhaan_record))
                    .route("/summary", web::get().to(dhaan_handlers::get_dhaan_summary))
                    .route("/{id}", web::get().to(dhaan_handlers::get_dhaan_record))
            )
            .service(
                web::scope("/chuira-records")
                    .route("", web::get().to(chuira_handlers::get_chuira_records))
                    .route("", web::post().to(chuira_handlers::create_chuira_record))
                    .route("", web::put().to(chuira_handlers::update_chuira_record))
                    .route("", web::delete().to(chuira_handlers::delete_chuira_record))
                    .route("/summary", web::get().to(chuira_handlers::get_chuira_summary))
                    .route("/{id}", web::get().to(chuira_handlers::get_chuira_record))
            )
            .service(
                web::scope("/employee-salary")
                    .route("", web::get().to(salary_handlers::get_salary_records))
                    .route("", web::post().to(salary_handlers::create_salary_record))
                    .route("", web::put().to(salary_handlers::update_salary_record))
                    .route("", web::delete().to(salary_handlers::delete_salary_record))
                    .route("/summary", web::get().to(salary_handlers::get_salary_summary))
                    .route("/{id}", web::get().to(salary_handlers::get_salary_record))
            )
            .service(
                web::scope("/extra-expenses")
                    .route("", web::get().to(expense_handlers::get_expense_records))
                    .route("", web::post().to(expense_handlers::create_expense_record))
                    .route("", web::put().to(expense_handlers::update_expense_record))
                    .route("", web::delete().to(expense_handlers::delete_expense_record))
                    .route("/summary", web::get().to(expense_handlers::get_expense_summary))
                    .route("/{id}", web::get().to(expense_handlers::get_expense_record))
            )
            .service(
                web::scope("/sales")
                    .route("", web::get().to(sales_handlers::get_sales_records))
                    .route("", web::post().to(sales_handlers::create_sales_record))
                    .route("", web::put().to(sales_handlers::update_sales_record))
                    .route("", web::delete().to(sales_handlers::delete_sales_record))
                    .route("/summary", web::get().to(sales_handlers::get_sales_summary))
                    .route("/next-order-id", web::get().to(sales_handlers::get_next_order_id))
                    .route("/{id}", web::get().to(sales_handlers::get_sales_record))
            )
    );
}

// ==================== TEST SUPPORT ====================

#[cfg(test)]
pub mod test_support {
    use actix_web::{body::to_bytes, dev::ServiceResponse, web};
    use std::sync::Arc;
    use crate::AppState;
    use crate::config::Config;

    pub async fn test_state() -> web::Data<Arc<AppState>> {
        let pool = crate::db::test_pool().await;
        web::Data::new(Arc::new(AppState {
            db_pool: pool,
            config: Config::default(),
        }))
    }

    pub async fn read_json(resp: ServiceResponse) -> serde_json::Value {
        let body = to_bytes(resp.into_body()).await.expect("body");
        serde_json::from_slice(&body).expect("json body")
    }

    /// Builds the full API against a fresh in-memory database.
    macro_rules! test_app {
        () => {{
            let state = crate::handlers::test_support::test_state().await;
            let app = actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(state.clone())
                    .configure(crate::handlers::configure_api(
                        crate::config::SecurityConfig::default().max_request_size,
                    )),
            )
            .await;
            (app, state)
        }};
    }

    pub(crate) use test_app;
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use super::test_support::{read_json, test_app};

    #[test]
    fn test_delete_query_requires_id() {
        let query = DeleteQuery { id: Some("  ".to_string()) };
        assert!(query.require_id().is_err());

        let query = DeleteQuery { id: Some("abc".to_string()) };
        assert_eq!(query.require_id().unwrap(), "abc");
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_envelope() {
        let (app, _state) = test_app!();

        let req = actix_test::TestRequest::post()
            .uri("/api/dhaan-records")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_delete_unknown_id_is_404_on_every_resource() {
        let (app, _state) = test_app!();

        for base in [
            "/api/dhaan-records",
            "/api/chuira-records",
            "/api/employee-salary",
            "/api/extra-expenses",
            "/api/sales",
        ] {
            let req = actix_test::TestRequest::delete()
                .uri(&format!("{}?id=does-not-exist", base))
                .to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", base);

            let req = actix_test::TestRequest::delete().uri(base).to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", base);
        }
    }

    #[actix_web::test]
    async fn test_update_unknown_id_is_404() {
        let (app, _state) = test_app!();

        let req = actix_test::TestRequest::put()
            .uri("/api/employee-salary")
            .set_json(serde_json::json!({
                "_id": "missing",
                "employeeName": "Gita",
                "salaryAmount": 15000,
                "paidDate": "2024-04-30"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_success_responses_use_data_envelope() {
        let (app, _state) = test_app!();

        let req = actix_test::TestRequest::post()
            .uri("/api/extra-expenses")
            .set_json(serde_json::json!({
                "date": "2024-05-03",
                "category": "Fuel",
                "amount": 2500
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["category"], "Fuel");
        assert!(body.get("record").is_none());

        let req = actix_test::TestRequest::get().uri("/api/extra-expenses").to_request();
        let body = read_json(actix_test::call_service(&app, req).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert!(body.get("records").is_none());

        let req = actix_test::TestRequest::get().uri("/api/extra-expenses/missing").to_request();
        let body = read_json(actix_test::call_service(&app, req).await).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
        assert!(body.get("error").is_none());
    }
}
