use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// Handler for `GET /healthz`. Liveness only, touches no dependencies.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness check for `GET /readyz`: 200 when the database answers a ping.
pub async fn readiness(db: &DatabaseConnection) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
