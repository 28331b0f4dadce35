use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoticeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{found, require_school_id, try_or_respond};

pub async fn get_notice(
    service: &NoticeService,
    request: &HttpRequest,
    notice_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let notice = try_or_respond!(found(
        storage.get_notice(school_id, notice_id).await,
        ErrorCode::NoticeNotFound,
        "Notice not found",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(notice, "Notice retrieved successfully")))
}
