use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::SuspensionStatus;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct CreateSuspensionRequest {
    pub student_id: i64,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct RevokeSuspensionRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct SuspensionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<SuspensionStatus>,
    pub active_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct SuspensionCheckQuery {
    pub date: Option<NaiveDate>,
}
