use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::AcademicYearService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    academic_years::{
        entities::Term,
        requests::{CreateExamRequest, UpdateExamRequest},
    },
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::{validate_required_text, validate_within};

// 考试日期须在学期内
fn check_exam_date(term: &Term, exam_date: Option<NaiveDate>) -> Result<(), String> {
    match exam_date {
        Some(date) => validate_within(date, date, term.start_date, term.end_date),
        None => Ok(()),
    }
}

pub async fn create_exam(
    service: &AcademicYearService,
    request: &HttpRequest,
    term_id: i64,
    req: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let term = try_or_respond!(found(
        storage.get_term(school_id, term_id).await,
        ErrorCode::TermNotFound,
        "Term not found",
    ));

    if let Err(msg) = validate_required_text(&req.name, "Exam name", 100)
        .and_then(|_| check_exam_date(&term, req.exam_date))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let exam = try_or_respond!(stored(
        storage.create_exam(school_id, term_id, req).await,
        "Exam creation failed",
    ));

    Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created successfully")))
}

pub async fn list_exams(
    service: &AcademicYearService,
    request: &HttpRequest,
    term_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_term(school_id, term_id).await,
        ErrorCode::TermNotFound,
        "Term not found",
    ));

    match storage.list_exams(school_id, term_id).await {
        Ok(exams) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(exams),
            "Exams retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve exams", e)),
    }
}

pub async fn update_exam(
    service: &AcademicYearService,
    request: &HttpRequest,
    exam_id: i64,
    update: UpdateExamRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let exam = try_or_respond!(found(
        storage.get_exam(school_id, exam_id).await,
        ErrorCode::ExamNotFound,
        "Exam not found",
    ));
    let term = try_or_respond!(found(
        storage.get_term(school_id, exam.term_id).await,
        ErrorCode::TermNotFound,
        "Term not found",
    ));

    if let Some(name) = &update.name
        && let Err(msg) = validate_required_text(name, "Exam name", 100)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = check_exam_date(&term, update.exam_date) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_exam(school_id, exam_id, update).await {
        Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exam,
            "Exam updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(storage_error("Exam update failed", e)),
    }
}

pub async fn delete_exam(
    service: &AcademicYearService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_exam(school_id, exam_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::ExamNotFound, "Exam not found")),
        Err(e) => Ok(storage_error("Exam deletion failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term() -> Term {
        Term {
            id: 1,
            school_id: 1,
            academic_year_id: 1,
            name: "Term 1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_exam_date_must_fall_in_term() {
        let term = term();
        assert!(check_exam_date(&term, None).is_ok());
        assert!(check_exam_date(&term, NaiveDate::from_ymd_opt(2025, 9, 30)).is_ok());
        assert!(check_exam_date(&term, NaiveDate::from_ymd_opt(2025, 10, 1)).is_err());
    }
}
