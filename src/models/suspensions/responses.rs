use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::Suspension;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct SuspensionCheck {
    pub student_id: i64,
    pub date: NaiveDate,
    pub suspended: bool,
    pub suspension: Option<Suspension>,
}
