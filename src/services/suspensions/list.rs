use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SuspensionService;
use crate::models::{ApiResponse, suspensions::requests::SuspensionListQuery};
use crate::services::{require_school_id, storage_error, try_or_respond};

pub async fn list_suspensions(
    service: &SuspensionService,
    request: &HttpRequest,
    query: SuspensionListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_suspensions_with_pagination(school_id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Suspension list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve suspension list", e)),
    }
}
