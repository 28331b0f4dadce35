use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoticeService;
use crate::models::{ApiResponse, notices::requests::NoticeListQuery};
use crate::services::{require_school_id, storage_error, try_or_respond};

pub async fn list_notices(
    service: &NoticeService,
    request: &HttpRequest,
    query: NoticeListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_notices_with_pagination(school_id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notice list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve notice list", e)),
    }
}
