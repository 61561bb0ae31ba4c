// src/monitoring.rs
//! Health probes and in-process request metrics

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use serde::Serialize;
use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex, atomic::{AtomicU64, Ordering}};
use std::time::Instant;
use crate::AppState;

/// Response times kept for the rolling average.
const RESPONSE_TIME_WINDOW: usize = 1000;

#[derive(Debug)]
pub struct Metrics {
    started_at: Instant,
    request_count: AtomicU64,
    error_count: AtomicU64,
    response_times: Mutex<VecDeque<u64>>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            response_times: Mutex::new(VecDeque::with_capacity(RESPONSE_TIME_WINDOW)),
        }
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_response_time(&self, time_ms: u64) {
        if let Ok(mut times) = self.response_times.lock() {
            if times.len() == RESPONSE_TIME_WINDOW {
                times.pop_front();
            }
            times.push_back(time_ms);
        }
    }

    pub fn snapshot(&self) -> MetricsResponse {
        let avg_response_time_ms = match self.response_times.lock() {
            Ok(times) if !times.is_empty() => {
                times.iter().sum::<u64>() as f64 / times.len() as f64
            }
            _ => 0.0,
        };

        MetricsResponse {
            requests_total: self.request_count.load(Ordering::Relaxed),
            errors_total: self.error_count.load(Ordering::Relaxed),
            avg_response_time_ms,
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub requests_total: u64,
    pub errors_total: u64,
    pub avg_response_time_ms: f64,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ==================== PROBES ====================

/// `GET /api/health`: round-trips `SELECT 1` through the pool.
pub async fn database_check(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&app_state.db_pool).await {
        Ok(_) => HttpResponse::Ok().json(DatabaseHealth {
            status: "success",
            message: "Database connection is healthy".to_string(),
            timestamp: Utc::now(),
        }),
        Err(e) => {
            log::error!("❌ Database health check failed: {}", e);
            HttpResponse::InternalServerError().json(DatabaseHealth {
                status: "error",
                message: "Database connection failed".to_string(),
                timestamp: Utc::now(),
            })
        }
    }
}

/// `GET /health`
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

/// `GET /health/metrics`
pub async fn metrics_endpoint(metrics: web::Data<Arc<Metrics>>) -> HttpResponse {
    HttpResponse::Ok().json(metrics.snapshot())
}

// ==================== MIDDLEWARE ====================

/// Counts requests and 4xx/5xx responses and records response times.
pub struct RequestLogger {
    metrics: Arc<Metrics>,
}

impl RequestLogger {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
    metrics: Arc<Metrics>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let metrics = self.metrics.clone();
        metrics.increment_requests();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            metrics.record_response_time(start_time.elapsed().as_millis() as u64);

            match &res {
                Ok(response) if response.status().is_client_error() || response.status().is_server_error() => {
                    metrics.increment_errors();
                }
                Err(_) => metrics.increment_errors(),
                _ => {}
            }
            res
        })
    }
}
