use serde::Serialize;
use ts_rs::TS;

use super::entities::{Class, Subject};

// 班级详情（含人数与科目）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
    pub subjects: Vec<Subject>,
}
