use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SuspensionService;
use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode, suspensions::requests::CreateSuspensionRequest};
use crate::services::{
    bad_request, conflict, found, require_school_id, storage_error, try_or_respond,
};
use crate::utils::validate::{validate_date_range, validate_required_text};

fn validate_suspension(req: &CreateSuspensionRequest) -> Result<(), String> {
    validate_required_text(&req.reason, "Suspension reason", 500)?;
    validate_date_range(req.start_date, req.end_date, false)
}

pub async fn create_suspension(
    service: &SuspensionService,
    request: &HttpRequest,
    req: CreateSuspensionRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Err(msg) = validate_suspension(&req) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    try_or_respond!(found(
        storage.get_student(school_id, req.student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    match storage.create_suspension(school_id, req).await {
        Ok(suspension) => {
            info!(
                "Student {} suspended from {} to {}",
                suspension.student_id, suspension.start_date, suspension.end_date
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                suspension,
                "Suspension created successfully",
            )))
        }
        Err(SchoolHubError::Conflict(msg)) => Ok(conflict(ErrorCode::SuspensionOverlap, msg)),
        Err(e) => Ok(storage_error("Suspension creation failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(start: u32, end: u32) -> CreateSuspensionRequest {
        CreateSuspensionRequest {
            student_id: 1,
            reason: "Fighting".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, start).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, end).unwrap(),
        }
    }

    #[test]
    fn test_single_day_suspension_allowed() {
        assert!(validate_suspension(&request(3, 3)).is_ok());
        assert!(validate_suspension(&request(3, 9)).is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert!(validate_suspension(&request(9, 3)).is_err());
    }
}
