use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SuspensionService;
use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode, suspensions::requests::RevokeSuspensionRequest};
use crate::services::{
    bad_request, conflict, not_found, require_school_id, storage_error, try_or_respond,
};
use crate::utils::validate::validate_required_text;

pub async fn revoke_suspension(
    service: &SuspensionService,
    request: &HttpRequest,
    suspension_id: i64,
    req: RevokeSuspensionRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required_text(&req.reason, "Revoke reason", 500) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage
        .revoke_suspension(school_id, suspension_id, req.reason.trim().to_string())
        .await
    {
        Ok(Some(suspension)) => {
            info!("Suspension {} revoked", suspension_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                suspension,
                "Suspension revoked successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SuspensionNotFound, "Suspension not found")),
        Err(SchoolHubError::InvalidState(msg)) => Ok(conflict(ErrorCode::SuspensionNotActive, msg)),
        Err(e) => Ok(storage_error("Suspension revoke failed", e)),
    }
}
