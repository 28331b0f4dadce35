use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub section: Option<String>,
    // 年级序号，升级时按它寻找下一个班级
    pub grade_level: i32,
    pub class_teacher: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn display_name(&self) -> String {
        match &self.section {
            Some(section) => format!("{} {}", self.name, section),
            None => self.name.clone(),
        }
    }
}

// 班级科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Subject {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub teacher_name: Option<String>,
    pub max_marks: f64,
    pub pass_marks: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Subject {
    /// 及格线对应的百分比
    pub fn pass_percentage(&self) -> f64 {
        if self.max_marks <= 0.0 {
            return 0.0;
        }
        self.pass_marks / self.max_marks * 100.0
    }
}

pub const DEFAULT_MAX_MARKS: f64 = 100.0;
pub const DEFAULT_PASS_MARKS: f64 = 33.0;
