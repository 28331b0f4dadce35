use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{NoticeService, check_notice_class, invalid_notice, validate_notice};
use crate::models::{ApiResponse, notices::requests::CreateNoticeRequest};
use crate::services::{require_school_id, storage_error, try_or_respond};

pub async fn create_notice(
    service: &NoticeService,
    request: &HttpRequest,
    req: CreateNoticeRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    // 未指定发布日期时从今天起生效
    let publish_on = req.publish_on.unwrap_or_else(|| Utc::now().date_naive());
    if let Err(msg) = validate_notice(
        &req.title,
        &req.body,
        req.audience,
        req.class_id,
        publish_on,
        req.expires_on,
    ) {
        return Ok(invalid_notice(msg));
    }
    try_or_respond!(check_notice_class(&storage, school_id, req.audience, req.class_id).await);

    match storage.create_notice(school_id, req, publish_on).await {
        Ok(notice) => {
            info!("Notice {} published for school {}", notice.id, school_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                notice,
                "Notice created successfully",
            )))
        }
        Err(e) => Ok(storage_error("Notice creation failed", e)),
    }
}
