use serde::Deserialize;
use ts_rs::TS;

// 升级计算参数，阈值缺省取配置
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionRequest {
    pub academic_year_id: i64,
    pub class_id: i64,
    pub promote_threshold: Option<f64>,
    pub repeat_threshold: Option<f64>,
    pub max_failed_subjects: Option<u32>,
    // 仅 apply 使用
    pub target_class_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "promotion.ts")]
pub struct PromotionRecordQuery {
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
}
