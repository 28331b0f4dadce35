use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub section: Option<String>,
    pub grade_level: i32,
    pub class_teacher: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub section: Option<String>,
    pub grade_level: Option<i32>,
    pub class_teacher: Option<String>,
    pub capacity: Option<i32>,
}

// 班级列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassListQuery {
    pub grade_level: Option<i32>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: Option<String>,
    pub teacher_name: Option<String>,
    pub max_marks: Option<f64>,
    pub pass_marks: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub teacher_name: Option<String>,
    pub max_marks: Option<f64>,
    pub pass_marks: Option<f64>,
}
