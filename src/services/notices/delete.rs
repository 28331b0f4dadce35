use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NoticeService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, require_school_id, storage_error, try_or_respond};

pub async fn delete_notice(
    service: &NoticeService,
    request: &HttpRequest,
    notice_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_notice(school_id, notice_id).await {
        Ok(true) => {
            info!("Notice {} deleted", notice_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notice deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::NoticeNotFound, "Notice not found")),
        Err(e) => Ok(storage_error("Notice deletion failed", e)),
    }
}
