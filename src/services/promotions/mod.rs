pub mod apply;
pub mod compute;
pub mod list;
pub mod preview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::{AcademicsConfig, AppConfig};
use crate::models::{
    ErrorCode,
    classes::entities::Class,
    promotions::{
        requests::{PromotionRecordQuery, PromotionRequest},
        responses::{PromotionPreview, PromotionSummary},
    },
};
use crate::services::{bad_request, found, stored};
use crate::storage::Storage;

pub struct PromotionService {
    storage: Option<Arc<dyn Storage>>,
}

impl PromotionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn preview(
        &self,
        request: &HttpRequest,
        req: PromotionRequest,
    ) -> ActixResult<HttpResponse> {
        preview::preview_promotion(self, request, req).await
    }

    pub async fn apply(
        &self,
        request: &HttpRequest,
        req: PromotionRequest,
    ) -> ActixResult<HttpResponse> {
        apply::apply_promotion(self, request, req).await
    }

    pub async fn list_records(
        &self,
        request: &HttpRequest,
        query: PromotionRecordQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_records(self, request, query).await
    }
}

/// 合并请求中的阈值与配置默认值
pub(crate) fn resolve_rules(
    req: &PromotionRequest,
    defaults: &AcademicsConfig,
) -> Result<AcademicsConfig, String> {
    let rules = AcademicsConfig {
        promote_threshold: req.promote_threshold.unwrap_or(defaults.promote_threshold),
        repeat_threshold: req.repeat_threshold.unwrap_or(defaults.repeat_threshold),
        max_failed_subjects: req.max_failed_subjects.unwrap_or(defaults.max_failed_subjects),
    };
    rules.validate()?;
    Ok(rules)
}

/// 请求阈值不合法时返回 400
pub(crate) fn request_rules(req: &PromotionRequest) -> Result<AcademicsConfig, HttpResponse> {
    resolve_rules(req, &AppConfig::get().academics)
        .map_err(|msg| bad_request(ErrorCode::ValidationFailed, msg))
}

/// 读取班级、学年和成绩汇总，算出整班的升级结果
///
/// 该学年已有升级记录的学生不参与计算。
pub(crate) async fn compute_preview(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    req: &PromotionRequest,
    rules: &AcademicsConfig,
) -> Result<(Class, PromotionPreview), HttpResponse> {
    let class = found(
        storage.get_class(school_id, req.class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    )?;
    found(
        storage.get_academic_year(school_id, req.academic_year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    )?;

    let exam_ids = stored(
        storage
            .list_exam_ids_for_year(school_id, req.academic_year_id)
            .await,
        "Failed to load exams",
    )?;
    if exam_ids.is_empty() {
        return Err(bad_request(
            ErrorCode::PromotionNoExams,
            "The academic year has no exams",
        ));
    }

    let students = stored(
        storage
            .list_promotion_candidates(school_id, req.academic_year_id, class.id)
            .await,
        "Failed to load class students",
    )?;
    let subjects = stored(
        storage.list_subjects(school_id, class.id).await,
        "Failed to load subjects",
    )?;
    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let subject_ids: Vec<i64> = subjects.iter().map(|s| s.id).collect();

    let totals = stored(
        storage
            .aggregate_marks(school_id, &exam_ids, &student_ids, &subject_ids)
            .await,
        "Failed to aggregate marks",
    )?;

    let results = compute::compute_results(&students, &subjects, &totals, rules);
    let preview = PromotionPreview {
        academic_year_id: req.academic_year_id,
        class_id: class.id,
        promote_threshold: rules.promote_threshold,
        repeat_threshold: rules.repeat_threshold,
        max_failed_subjects: rules.max_failed_subjects,
        summary: PromotionSummary::tally(&results),
        students: results,
    };
    Ok((class, preview))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(promote: Option<f64>, repeat: Option<f64>) -> PromotionRequest {
        PromotionRequest {
            academic_year_id: 1,
            class_id: 1,
            promote_threshold: promote,
            repeat_threshold: repeat,
            max_failed_subjects: None,
            target_class_id: None,
        }
    }

    fn defaults() -> AcademicsConfig {
        AcademicsConfig {
            promote_threshold: 40.0,
            repeat_threshold: 25.0,
            max_failed_subjects: 1,
        }
    }

    #[test]
    fn test_resolve_rules_defaults_and_overrides() {
        let rules = resolve_rules(&request(None, None), &defaults()).unwrap();
        assert_eq!(rules.promote_threshold, 40.0);
        assert_eq!(rules.max_failed_subjects, 1);

        let rules = resolve_rules(&request(Some(60.0), Some(50.0)), &defaults()).unwrap();
        assert_eq!(rules.promote_threshold, 60.0);
        assert_eq!(rules.repeat_threshold, 50.0);
    }

    #[test]
    fn test_resolve_rules_rejects_inverted_thresholds() {
        assert!(resolve_rules(&request(Some(20.0), None), &defaults()).is_err());
        assert!(resolve_rules(&request(Some(101.0), None), &defaults()).is_err());
    }
}
