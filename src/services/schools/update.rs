use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SchoolService, validate_contact};
use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode, schools::requests::UpdateSchoolRequest};
use crate::services::{bad_request, conflict, not_found, storage_error};
use crate::utils::validate::{validate_required_text, validate_school_code};

pub async fn update_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
    update: UpdateSchoolRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &update.name
        && let Err(msg) = validate_required_text(name, "School name", 120)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(code) = &update.code
        && let Err(msg) = validate_school_code(code)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_contact(update.phone.as_deref(), update.email.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_school(school_id, update).await {
        Ok(Some(school)) => {
            service.evict_cache(request, school_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                school,
                "School updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(SchoolHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::SchoolAlreadyExists,
            "School name or code already exists",
        )),
        Err(e) => Ok(storage_error("School update failed", e)),
    }
}
