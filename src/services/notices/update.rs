use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NoticeService, check_notice_class, invalid_notice, validate_notice};
use crate::models::{ApiResponse, ErrorCode, notices::requests::UpdateNoticeRequest};
use crate::services::{found, not_found, require_school_id, storage_error, try_or_respond};

pub async fn update_notice(
    service: &NoticeService,
    request: &HttpRequest,
    notice_id: i64,
    update: UpdateNoticeRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let current = try_or_respond!(found(
        storage.get_notice(school_id, notice_id).await,
        ErrorCode::NoticeNotFound,
        "Notice not found",
    ));

    // 合并后整体校验
    let audience = update.audience.unwrap_or(current.audience);
    let class_id = update.class_id.or(current.class_id);
    let publish_on = update.publish_on.unwrap_or(current.publish_on);
    let expires_on = update.expires_on.or(current.expires_on);
    if let Err(msg) = validate_notice(
        update.title.as_deref().unwrap_or(&current.title),
        update.body.as_deref().unwrap_or(&current.body),
        audience,
        class_id,
        publish_on,
        expires_on,
    ) {
        return Ok(invalid_notice(msg));
    }
    if update.class_id.is_some() || update.audience.is_some() {
        try_or_respond!(check_notice_class(&storage, school_id, audience, class_id).await);
    }

    match storage.update_notice(school_id, notice_id, update).await {
        Ok(Some(notice)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notice,
            "Notice updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::NoticeNotFound, "Notice not found")),
        Err(e) => Ok(storage_error("Notice update failed", e)),
    }
}
