use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComplaintService;
use crate::models::{ApiResponse, complaints::requests::ComplaintListQuery};
use crate::services::{require_school_id, storage_error, try_or_respond};

pub async fn list_complaints(
    service: &ComplaintService,
    request: &HttpRequest,
    query: ComplaintListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_complaints_with_pagination(school_id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Complaint list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve complaint list", e)),
    }
}
