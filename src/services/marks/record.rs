use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MarkService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    classes::entities::Subject,
    marks::requests::{MarkEntry, RecordMarksRequest},
};
use crate::services::{bad_request, found, require_school_id, stored, try_or_respond};

/// 成绩须在 [0, 满分] 内，学生不得重复且须为该科目所在班级的在读学生
fn check_entries(
    entries: &[MarkEntry],
    subject: &Subject,
    class_members: &HashSet<i64>,
) -> Result<(), (ErrorCode, String)> {
    if entries.is_empty() {
        return Err((
            ErrorCode::MarksInvalid,
            "At least one mark entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err((
                ErrorCode::MarksInvalid,
                format!("Student {} appears more than once", entry.student_id),
            ));
        }
        let marks = entry.marks_obtained;
        if !marks.is_finite() || marks < 0.0 || marks > subject.max_marks {
            return Err((
                ErrorCode::MarksInvalid,
                format!(
                    "Marks {} for student {} must be within 0..={}",
                    marks, entry.student_id, subject.max_marks
                ),
            ));
        }
        if !class_members.contains(&entry.student_id) {
            return Err((
                ErrorCode::StudentNotInClass,
                format!("Student {} is not an active member of this class", entry.student_id),
            ));
        }
    }
    Ok(())
}

pub async fn record_marks(
    service: &MarkService,
    request: &HttpRequest,
    exam_id: i64,
    req: RecordMarksRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_exam(school_id, exam_id).await,
        ErrorCode::ExamNotFound,
        "Exam not found",
    ));
    let subject = try_or_respond!(found(
        storage.get_subject(school_id, req.subject_id).await,
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ));
    let members: HashSet<i64> = try_or_respond!(stored(
        storage
            .list_active_class_students(school_id, subject.class_id)
            .await,
        "Failed to load class students",
    ))
    .into_iter()
    .map(|s| s.id)
    .collect();

    if let Err((code, msg)) = check_entries(&req.entries, &subject, &members) {
        return Ok(bad_request(code, msg));
    }

    let marks = try_or_respond!(stored(
        storage
            .upsert_marks(school_id, exam_id, &subject, req.entries)
            .await,
        "Failed to save marks",
    ));

    info!(
        "Recorded {} marks for subject {} in exam {}",
        marks.len(),
        subject.name,
        exam_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ItemsResponse::new(marks),
        "Marks saved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject {
            id: 1,
            school_id: 1,
            class_id: 1,
            name: "Science".to_string(),
            code: None,
            teacher_name: None,
            max_marks: 50.0,
            pass_marks: 17.0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn entry(student_id: i64, marks: f64) -> MarkEntry {
        MarkEntry {
            student_id,
            marks_obtained: marks,
            remark: None,
        }
    }

    #[test]
    fn test_marks_range() {
        let members = HashSet::from([1, 2]);
        assert!(check_entries(&[entry(1, 0.0), entry(2, 50.0)], &subject(), &members).is_ok());
        assert!(check_entries(&[entry(1, 50.5)], &subject(), &members).is_err());
        assert!(check_entries(&[entry(1, -1.0)], &subject(), &members).is_err());
        assert!(check_entries(&[entry(1, f64::NAN)], &subject(), &members).is_err());
    }

    #[test]
    fn test_membership_and_duplicates() {
        let members = HashSet::from([1]);
        let (code, _) = check_entries(&[entry(3, 10.0)], &subject(), &members).unwrap_err();
        assert_eq!(code, ErrorCode::StudentNotInClass);
        let (code, _) =
            check_entries(&[entry(1, 10.0), entry(1, 12.0)], &subject(), &members).unwrap_err();
        assert_eq!(code, ErrorCode::MarksInvalid);
    }
}
