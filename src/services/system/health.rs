use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::SystemService;
use crate::models::{AppStartTime, ApiResponse, ErrorCode, system::responses::HealthResponse};

fn build_health(started: DateTime<Utc>, now: DateTime<Utc>, database: bool) -> HealthResponse {
    HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (now - started).num_seconds().max(0),
        database,
    }
}

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let now = Utc::now();
    let started = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    let database = match storage.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let report = build_health(started, now, database);
    if database {
        Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Service is healthy")))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
            ErrorCode::InternalServerError,
            report,
            "Database is unreachable",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_build_health() {
        let now = Utc::now();
        let report = build_health(now - Duration::seconds(90), now, true);
        assert_eq!(report.status, "ok");
        assert_eq!(report.uptime_seconds, 90);
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));

        let report = build_health(now, now, false);
        assert_eq!(report.status, "degraded");
        assert!(!report.database);
    }
}
