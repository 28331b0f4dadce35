use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试成绩，满分从科目复制
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct Mark {
    pub id: i64,
    pub school_id: i64,
    pub exam_id: i64,
    pub subject_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub remark: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学生单科在若干场考试中的得分合计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkTotal {
    pub student_id: i64,
    pub subject_id: i64,
    pub obtained: f64,
    pub maximum: f64,
}
