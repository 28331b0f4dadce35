use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct MarkEntry {
    pub student_id: i64,
    pub marks_obtained: f64,
    pub remark: Option<String>,
}

// 录入某场考试某科目的成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct RecordMarksRequest {
    pub subject_id: i64,
    pub entries: Vec<MarkEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct MarkListQuery {
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct ReportCardQuery {
    pub exam_id: i64,
}
