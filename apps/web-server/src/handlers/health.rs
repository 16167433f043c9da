//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub storage: &'static str,
    pub request_id: String,
}

#[cfg(feature = "postgres")]
async fn storage_healthy(state: &AppState) -> bool {
    match &state.db {
        Some(db) => db
            .ping()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Database ping failed"))
            .is_ok(),
        None => true,
    }
}

#[cfg(not(feature = "postgres"))]
async fn storage_healthy(_state: &AppState) -> bool {
    true
}

/// Health check endpoint - returns server and storage status.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let status = if storage_healthy(&state).await {
        "ok"
    } else {
        "degraded"
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        storage: state.storage(),
        request_id: request_id.0,
    };

    if status == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
