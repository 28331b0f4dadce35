use serde::Serialize;
use ts_rs::TS;

use super::entities::{PromotionDecision, PromotionRecord};

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct SubjectResult {
    pub subject_id: i64,
    pub subject_name: String,
    pub obtained: f64,
    pub max: f64,
    pub percentage: f64,
    pub passed: bool,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct StudentPromotionResult {
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub average: Option<f64>,
    pub failed_subjects: u32,
    pub class_rank: Option<u32>,
    pub decision: PromotionDecision,
    pub subjects: Vec<SubjectResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionSummary {
    pub total: u32,
    pub promoted: u32,
    pub repeated: u32,
    pub dropped: u32,
}

impl PromotionSummary {
    pub fn tally(results: &[StudentPromotionResult]) -> Self {
        let mut summary = PromotionSummary {
            total: results.len() as u32,
            ..Default::default()
        };
        for result in results {
            match result.decision {
                PromotionDecision::Promote => summary.promoted += 1,
                PromotionDecision::Repeat => summary.repeated += 1,
                PromotionDecision::Drop => summary.dropped += 1,
            }
        }
        summary
    }
}

// 预览结果（不落库）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionPreview {
    pub academic_year_id: i64,
    pub class_id: i64,
    pub promote_threshold: f64,
    pub repeat_threshold: f64,
    pub max_failed_subjects: u32,
    pub students: Vec<StudentPromotionResult>,
    pub summary: PromotionSummary,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionApplyResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub preview: PromotionPreview,
    pub target_class_id: Option<i64>,
    // 没有更高年级时升级学生改为毕业
    pub graduated: bool,
    pub records: Vec<PromotionRecord>,
}
