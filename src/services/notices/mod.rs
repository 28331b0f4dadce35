pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    notices::{
        entities::NoticeAudience,
        requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest},
    },
};
use crate::services::{bad_request, found};
use crate::storage::Storage;
use crate::utils::validate::{validate_date_range, validate_required_text};

pub struct NoticeService {
    storage: Option<Arc<dyn Storage>>,
}

impl NoticeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_notice(
        &self,
        request: &HttpRequest,
        req: CreateNoticeRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_notice(self, request, req).await
    }

    pub async fn list_notices(
        &self,
        request: &HttpRequest,
        query: NoticeListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_notices(self, request, query).await
    }

    pub async fn get_notice(&self, request: &HttpRequest, notice_id: i64) -> ActixResult<HttpResponse> {
        get::get_notice(self, request, notice_id).await
    }

    pub async fn update_notice(
        &self,
        request: &HttpRequest,
        notice_id: i64,
        update: UpdateNoticeRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_notice(self, request, notice_id, update).await
    }

    pub async fn delete_notice(
        &self,
        request: &HttpRequest,
        notice_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_notice(self, request, notice_id).await
    }
}

/// 校验通知字段（创建与更新合并后的最终值）
pub(crate) fn validate_notice(
    title: &str,
    body: &str,
    audience: NoticeAudience,
    class_id: Option<i64>,
    publish_on: NaiveDate,
    expires_on: Option<NaiveDate>,
) -> Result<(), String> {
    validate_required_text(title, "Notice title", 200)?;
    validate_required_text(body, "Notice body", 5000)?;
    if audience == NoticeAudience::Class && class_id.is_none() {
        return Err("class_id is required when audience is class".to_string());
    }
    match expires_on {
        Some(expires) => validate_date_range(publish_on, expires, false),
        None => Ok(()),
    }
}

// 班级通知指向的班级须属于本校
pub(crate) async fn check_notice_class(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    audience: NoticeAudience,
    class_id: Option<i64>,
) -> Result<(), HttpResponse> {
    match class_id {
        Some(class_id) if audience == NoticeAudience::Class => found(
            storage.get_class(school_id, class_id).await,
            ErrorCode::ClassNotFound,
            "Class not found",
        )
        .map(|_| ()),
        _ => Ok(()),
    }
}

pub(crate) fn invalid_notice(msg: String) -> HttpResponse {
    bad_request(ErrorCode::ValidationFailed, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_validate_notice_dates() {
        assert!(validate_notice("Holiday", "School closed", NoticeAudience::All, None, date(1), None).is_ok());
        assert!(
            validate_notice("Holiday", "School closed", NoticeAudience::All, None, date(1), Some(date(1)))
                .is_ok()
        );
        assert!(
            validate_notice("Holiday", "School closed", NoticeAudience::All, None, date(5), Some(date(4)))
                .is_err()
        );
    }

    #[test]
    fn test_class_audience_requires_class() {
        assert!(validate_notice("Trip", "Bring lunch", NoticeAudience::Class, None, date(1), None).is_err());
        assert!(
            validate_notice("Trip", "Bring lunch", NoticeAudience::Class, Some(3), date(1), None).is_ok()
        );
        assert!(validate_notice(" ", "Bring lunch", NoticeAudience::Staff, None, date(1), None).is_err());
    }
}
