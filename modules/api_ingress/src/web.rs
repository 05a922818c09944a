use axum::response::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    pub status: &'static str,
    /// RFC 3339
    pub timestamp: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Server is up", body = Health))
)]
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
