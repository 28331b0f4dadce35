use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComplaintService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{found, require_school_id, try_or_respond};

pub async fn get_complaint(
    service: &ComplaintService,
    request: &HttpRequest,
    complaint_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let complaint = try_or_respond!(found(
        storage.get_complaint(school_id, complaint_id).await,
        ErrorCode::ComplaintNotFound,
        "Complaint not found",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        complaint,
        "Complaint retrieved successfully",
    )))
}
