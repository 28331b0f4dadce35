use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::NoticeAudience;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct CreateNoticeRequest {
    pub title: String,
    pub body: String,
    pub audience: NoticeAudience,
    pub class_id: Option<i64>,
    pub publish_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub audience: Option<NoticeAudience>,
    pub class_id: Option<i64>,
    pub publish_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub is_pinned: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct NoticeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub audience: Option<NoticeAudience>,
    pub class_id: Option<i64>,
    pub active_on: Option<NaiveDate>,
}
