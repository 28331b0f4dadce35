use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "promotion.ts")]
    PromotionDecision {
        Promote => "promote",
        Repeat => "repeat",
        Drop => "drop",
    }
}

// 已落库的升级结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionRecord {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub academic_year_id: i64,
    pub from_class_id: i64,
    pub to_class_id: Option<i64>,
    pub average: Option<f64>,
    pub class_rank: Option<u32>,
    pub decision: PromotionDecision,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 单个学生的升级结论，写库用
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionOutcome {
    pub student_id: i64,
    pub decision: PromotionDecision,
    pub average: Option<f64>,
    pub class_rank: Option<u32>,
}

/// 一个班级一次升级的写库计划
///
/// `target_class_id` 为空时升级学生标记为毕业。
#[derive(Debug, Clone)]
pub struct PromotionPlan {
    pub academic_year_id: i64,
    pub from_class_id: i64,
    pub target_class_id: Option<i64>,
    pub outcomes: Vec<PromotionOutcome>,
}
