use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SchoolService, validate_contact};
use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode, schools::requests::CreateSchoolRequest};
use crate::services::{bad_request, conflict, storage_error};
use crate::utils::validate::{validate_required_text, validate_school_code};

pub async fn create_school(
    service: &SchoolService,
    request: &HttpRequest,
    req: CreateSchoolRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required_text(&req.name, "School name", 120) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_school_code(&req.code) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_contact(req.phone.as_deref(), req.email.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    match storage.create_school(req).await {
        Ok(school) => {
            info!("School {} ({}) created", school.name, school.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                school,
                "School created successfully",
            )))
        }
        Err(SchoolHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::SchoolAlreadyExists,
            "School name or code already exists",
        )),
        Err(e) => Ok(storage_error("School creation failed", e)),
    }
}
