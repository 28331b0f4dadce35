use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ComplaintService;
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    complaints::{entities::ComplaintStatus, requests::UpdateComplaintStatusRequest},
};
use crate::services::{
    bad_request, conflict, found, not_found, require_school_id, storage_error, try_or_respond,
};

/// 检查状态流转，返回去除空白后的处理结果
fn check_transition(
    current: ComplaintStatus,
    next: ComplaintStatus,
    resolution: Option<String>,
) -> Result<Option<String>, HttpResponse> {
    if !current.can_transition_to(next) {
        return Err(conflict(
            ErrorCode::ComplaintInvalidTransition,
            format!("Cannot move complaint from {current} to {next}"),
        ));
    }

    let resolution = resolution
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    if next.is_terminal() && resolution.is_none() {
        return Err(bad_request(
            ErrorCode::ValidationFailed,
            format!("A resolution is required to mark a complaint {next}"),
        ));
    }
    Ok(resolution)
}

pub async fn update_status(
    service: &ComplaintService,
    request: &HttpRequest,
    complaint_id: i64,
    req: UpdateComplaintStatusRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let complaint = try_or_respond!(found(
        storage.get_complaint(school_id, complaint_id).await,
        ErrorCode::ComplaintNotFound,
        "Complaint not found",
    ));
    let resolution = try_or_respond!(check_transition(complaint.status, req.status, req.resolution));

    match storage
        .update_complaint_status(school_id, complaint_id, complaint.status, req.status, resolution)
        .await
    {
        Ok(Some(updated)) => {
            info!(
                "Complaint {} moved from {} to {}",
                complaint_id, complaint.status, updated.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Complaint status updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::ComplaintNotFound, "Complaint not found")),
        // 读取之后状态已被其他请求修改
        Err(SchoolHubError::InvalidState(msg)) => {
            Ok(conflict(ErrorCode::ComplaintInvalidTransition, msg))
        }
        Err(e) => Ok(storage_error("Complaint status update failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_terminal_requires_resolution() {
        let err = check_transition(ComplaintStatus::Open, ComplaintStatus::Resolved, None).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = check_transition(
            ComplaintStatus::InProgress,
            ComplaintStatus::Rejected,
            Some("   ".to_string()),
        )
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let ok = check_transition(
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
            Some(" Bus route changed ".to_string()),
        )
        .unwrap();
        assert_eq!(ok.as_deref(), Some("Bus route changed"));
    }

    #[test]
    fn test_invalid_transition_conflicts() {
        let err = check_transition(
            ComplaintStatus::Resolved,
            ComplaintStatus::InProgress,
            Some("reopen".to_string()),
        )
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(check_transition(ComplaintStatus::Open, ComplaintStatus::InProgress, None).is_ok());
    }
}
