use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct ReportCardSubject {
    pub subject_id: i64,
    pub subject_name: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub percentage: f64,
    pub grade: String,
    pub passed: bool,
}

// 单场考试成绩单
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "marks.ts")]
pub struct ReportCard {
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub class_id: i64,
    pub exam_id: i64,
    pub exam_name: String,
    pub subjects: Vec<ReportCardSubject>,
    pub total_obtained: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub grade: String,
    pub class_rank: Option<u32>,
    pub class_size: u32,
}
