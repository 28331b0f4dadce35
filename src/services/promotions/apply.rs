use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{PromotionService, compute_preview, request_rules};
use crate::config::AcademicsConfig;
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    promotions::{
        entities::{PromotionOutcome, PromotionPlan},
        requests::PromotionRequest,
        responses::PromotionApplyResponse,
    },
};
use crate::services::{
    bad_request, conflict, found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::storage::Storage;

pub async fn apply_promotion(
    service: &PromotionService,
    request: &HttpRequest,
    req: PromotionRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);
    let rules = try_or_respond!(request_rules(&req));

    let response = try_or_respond!(run_promotion(&storage, school_id, &req, &rules).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Promotion applied successfully",
    )))
}

/// 重新计算并落库一次升级
pub(crate) async fn run_promotion(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    req: &PromotionRequest,
    rules: &AcademicsConfig,
) -> Result<PromotionApplyResponse, HttpResponse> {
    let applied = stored(
        storage
            .promotion_applied(school_id, req.academic_year_id, req.class_id)
            .await,
        "Failed to check promotion state",
    )?;
    if applied {
        return Err(already_applied());
    }

    let (class, preview) = compute_preview(storage, school_id, req, rules).await?;
    if preview.students.is_empty() {
        return Err(bad_request(
            ErrorCode::PromotionNoStudents,
            "The class has no active students to promote",
        ));
    }

    // 默认升入更高年级中 id 最小的班级，没有则毕业
    let target = match req.target_class_id {
        Some(target_id) if target_id == class.id => {
            return Err(bad_request(
                ErrorCode::ValidationFailed,
                "Target class must differ from the current class",
            ));
        }
        Some(target_id) => Some(found(
            storage.get_class(school_id, target_id).await,
            ErrorCode::ClassNotFound,
            "Target class not found",
        )?),
        None => stored(
            storage.find_next_grade_class(school_id, class.grade_level).await,
            "Failed to find next grade class",
        )?,
    };

    if let Some((target, capacity)) = target
        .as_ref()
        .and_then(|t| t.capacity.map(|capacity| (t, capacity)))
    {
        let enrolled = stored(
            storage.count_active_students(school_id, target.id).await,
            "Failed to count class students",
        )?;
        let incoming = i64::from(preview.summary.promoted);
        if enrolled + incoming > i64::from(capacity) {
            return Err(conflict(
                ErrorCode::ClassFull,
                format!(
                    "Class {} cannot take {incoming} more students ({enrolled} of {capacity} places used)",
                    target.display_name()
                ),
            ));
        }
    }
    let target_class_id = target.as_ref().map(|c| c.id);

    let plan = PromotionPlan {
        academic_year_id: req.academic_year_id,
        from_class_id: class.id,
        target_class_id,
        outcomes: preview
            .students
            .iter()
            .map(|r| PromotionOutcome {
                student_id: r.student_id,
                decision: r.decision,
                average: r.average,
                class_rank: r.class_rank,
            })
            .collect(),
    };

    let records = match storage.apply_promotion(school_id, plan).await {
        Ok(records) => records,
        // 并发请求撞上唯一约束
        Err(SchoolHubError::Conflict(_)) => return Err(already_applied()),
        Err(e) => return Err(storage_error("Failed to apply promotion", e)),
    };

    info!(
        "Applied promotion for class {} (year {}): {} promoted, {} repeated, {} dropped",
        class.display_name(),
        req.academic_year_id,
        preview.summary.promoted,
        preview.summary.repeated,
        preview.summary.dropped
    );

    Ok(PromotionApplyResponse {
        graduated: target_class_id.is_none(),
        preview,
        target_class_id,
        records,
    })
}

fn already_applied() -> HttpResponse {
    conflict(
        ErrorCode::PromotionAlreadyApplied,
        "Promotion has already been applied for this class and year",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        classes::requests::CreateClassRequest,
        marks::requests::MarkEntry,
        promotions::entities::PromotionDecision,
        students::{entities::StudentStatus, requests::UpdateStudentRequest},
    };
    use crate::storage::sea_orm_storage::{
        SeaOrmStorage,
        test_support::{
            seed_class, seed_exam, seed_school, seed_student, seed_subject, seed_term, seed_year,
        },
    };
    use actix_web::http::StatusCode;

    fn rules() -> AcademicsConfig {
        AcademicsConfig {
            promote_threshold: 40.0,
            repeat_threshold: 25.0,
            max_failed_subjects: 1,
        }
    }

    fn request(academic_year_id: i64, class_id: i64) -> PromotionRequest {
        PromotionRequest {
            academic_year_id,
            class_id,
            promote_threshold: None,
            repeat_threshold: None,
            max_failed_subjects: None,
            target_class_id: None,
        }
    }

    fn entry(student_id: i64, marks: f64) -> MarkEntry {
        MarkEntry {
            student_id,
            marks_obtained: marks,
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_lower_grade_first_then_next_grade() {
        let db = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&db, "ORD").await;
        let year = seed_year(&db, school.id, "2025").await;
        let term = seed_term(&db, school.id, year.id, "Term 1").await;
        let exam = seed_exam(&db, school.id, term.id, "Final").await;
        let grade1 = seed_class(&db, school.id, "Grade 1", 1).await;
        let grade2 = seed_class(&db, school.id, "Grade 2", 2).await;
        let maths1 = seed_subject(&db, school.id, grade1.id, "Maths").await;
        let maths2 = seed_subject(&db, school.id, grade2.id, "Maths").await;
        let lower = seed_student(&db, school.id, grade1.id, "P-1").await;
        let upper = seed_student(&db, school.id, grade2.id, "P-2").await;
        db.upsert_marks_impl(school.id, exam.id, &maths1, vec![entry(lower.id, 80.0)])
            .await
            .unwrap();
        db.upsert_marks_impl(school.id, exam.id, &maths2, vec![entry(upper.id, 70.0)])
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(db);

        let first = run_promotion(&storage, school.id, &request(year.id, grade1.id), &rules())
            .await
            .unwrap();
        assert_eq!(first.target_class_id, Some(grade2.id));
        assert_eq!(first.records.len(), 1);

        // 刚升上来的 P-1 不计入 Grade 2
        let second = run_promotion(&storage, school.id, &request(year.id, grade2.id), &rules())
            .await
            .unwrap();
        assert_eq!(second.preview.students.len(), 1);
        assert_eq!(second.preview.students[0].student_id, upper.id);
        assert_eq!(second.target_class_id, None);
        assert!(second.graduated);

        let upper = storage.get_student(school.id, upper.id).await.unwrap().unwrap();
        assert_eq!(upper.status, StudentStatus::Graduated);
        let lower = storage.get_student(school.id, lower.id).await.unwrap().unwrap();
        assert_eq!(lower.class_id, grade2.id);
        assert_eq!(lower.status, StudentStatus::Active);
    }

    #[tokio::test]
    async fn test_pipeline_aggregates_and_moves_students() {
        let db = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&db, "PIP").await;
        let year = seed_year(&db, school.id, "2025").await;
        let term = seed_term(&db, school.id, year.id, "Term 1").await;
        let mid = seed_exam(&db, school.id, term.id, "Mid").await;
        let end = seed_exam(&db, school.id, term.id, "End").await;
        let grade3 = seed_class(&db, school.id, "Grade 3", 3).await;
        let grade5 = seed_class(&db, school.id, "Grade 5", 5).await;
        let grade4b = seed_class(&db, school.id, "Grade 4B", 4).await;
        let grade4a = seed_class(&db, school.id, "Grade 4A", 4).await;
        let maths = seed_subject(&db, school.id, grade3.id, "Maths").await;
        let science = seed_subject(&db, school.id, grade3.id, "Science").await;
        let other = seed_subject(&db, school.id, grade5.id, "History").await;

        let top = seed_student(&db, school.id, grade3.id, "A-1").await;
        let weak = seed_student(&db, school.id, grade3.id, "A-2").await;
        let gone = seed_student(&db, school.id, grade3.id, "A-3").await;
        let blank = seed_student(&db, school.id, grade3.id, "A-4").await;
        db.update_student_impl(
            school.id,
            gone.id,
            UpdateStudentRequest {
                status: Some(StudentStatus::Dropped),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Maths: 90+70 / 200 = 80%，Science: 60+50 / 200 = 55%
        db.upsert_marks_impl(
            school.id,
            mid.id,
            &maths,
            vec![entry(top.id, 90.0), entry(weak.id, 10.0), entry(gone.id, 100.0)],
        )
            .await
            .unwrap();
        db.upsert_marks_impl(school.id, end.id, &maths, vec![entry(top.id, 70.0), entry(weak.id, 20.0)])
            .await
            .unwrap();
        db.upsert_marks_impl(school.id, mid.id, &science, vec![entry(top.id, 60.0), entry(weak.id, 30.0)])
            .await
            .unwrap();
        db.upsert_marks_impl(school.id, end.id, &science, vec![entry(top.id, 50.0)])
            .await
            .unwrap();
        // 其他班级的科目不参与汇总
        db.upsert_marks_impl(school.id, mid.id, &other, vec![entry(top.id, 0.0)])
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(db);

        let (_, preview) = compute_preview(&storage, school.id, &request(year.id, grade3.id), &rules())
            .await
            .unwrap();
        let admission: Vec<&str> = preview.students.iter().map(|s| s.admission_no.as_str()).collect();
        assert_eq!(admission, vec!["A-1", "A-2", "A-4"]);

        let first = &preview.students[0];
        assert_eq!(first.subjects.len(), 2);
        assert_eq!(first.average, Some(67.5));
        assert_eq!(first.class_rank, Some(1));
        assert_eq!(first.decision, PromotionDecision::Promote);

        // Maths 30/200 = 15%，Science 30/100 = 30%
        let second = &preview.students[1];
        assert_eq!(second.average, Some(22.5));
        assert_eq!(second.decision, PromotionDecision::Drop);

        let third = &preview.students[2];
        assert_eq!(third.average, None);
        assert_eq!(third.class_rank, None);
        assert_eq!(third.decision, PromotionDecision::Repeat);
        assert_eq!(preview.summary.total, 3);

        let applied = run_promotion(&storage, school.id, &request(year.id, grade3.id), &rules())
            .await
            .unwrap();
        // 同年级中 id 最小的班级
        assert_eq!(applied.target_class_id, Some(grade4b.id));
        assert_ne!(applied.target_class_id, Some(grade4a.id));
        assert!(!applied.graduated);
        assert_eq!(applied.records.len(), 3);

        let top = storage.get_student(school.id, top.id).await.unwrap().unwrap();
        assert_eq!(top.class_id, grade4b.id);
        let weak = storage.get_student(school.id, weak.id).await.unwrap().unwrap();
        assert_eq!(weak.status, StudentStatus::Dropped);
        let blank = storage.get_student(school.id, blank.id).await.unwrap().unwrap();
        assert_eq!(blank.class_id, grade3.id);

        let err = run_promotion(&storage, school.id, &request(year.id, grade3.id), &rules())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_year_without_exams_is_rejected() {
        let db = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&db, "NEX").await;
        let year = seed_year(&db, school.id, "2025").await;
        seed_term(&db, school.id, year.id, "Term 1").await;
        let class = seed_class(&db, school.id, "Grade 1", 1).await;
        seed_student(&db, school.id, class.id, "N-1").await;
        let storage: Arc<dyn Storage> = Arc::new(db);

        let err = compute_preview(&storage, school.id, &request(year.id, class.id), &rules())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_class_is_rejected() {
        let db = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&db, "EMP").await;
        let year = seed_year(&db, school.id, "2025").await;
        let term = seed_term(&db, school.id, year.id, "Term 1").await;
        seed_exam(&db, school.id, term.id, "Final").await;
        let class = seed_class(&db, school.id, "Grade 1", 1).await;
        let storage: Arc<dyn Storage> = Arc::new(db);

        for _ in 0..2 {
            let err = run_promotion(&storage, school.id, &request(year.id, class.id), &rules())
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert!(!storage
            .promotion_applied(school.id, year.id, class.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_full_target_class_is_rejected() {
        let db = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&db, "CAP").await;
        let year = seed_year(&db, school.id, "2025").await;
        let term = seed_term(&db, school.id, year.id, "Term 1").await;
        let exam = seed_exam(&db, school.id, term.id, "Final").await;
        let grade1 = seed_class(&db, school.id, "Grade 1", 1).await;
        let grade2 = db
            .create_class_impl(
                school.id,
                CreateClassRequest {
                    name: "Grade 2".to_string(),
                    section: None,
                    grade_level: 2,
                    class_teacher: None,
                    capacity: Some(1),
                },
            )
            .await
            .unwrap();
        let maths = seed_subject(&db, school.id, grade1.id, "Maths").await;
        let a = seed_student(&db, school.id, grade1.id, "C-1").await;
        let b = seed_student(&db, school.id, grade1.id, "C-2").await;
        seed_student(&db, school.id, grade2.id, "C-3").await;
        db.upsert_marks_impl(school.id, exam.id, &maths, vec![entry(a.id, 90.0), entry(b.id, 85.0)])
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(db);

        let err = run_promotion(&storage, school.id, &request(year.id, grade1.id), &rules())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        // 没有写入任何记录
        let a = storage.get_student(school.id, a.id).await.unwrap().unwrap();
        assert_eq!(a.class_id, grade1.id);
        assert!(!storage
            .promotion_applied(school.id, year.id, grade1.id)
            .await
            .unwrap());
    }
}
