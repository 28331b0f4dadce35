use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    classes::{
        entities::{DEFAULT_MAX_MARKS, DEFAULT_PASS_MARKS},
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
    },
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::validate_required_text;

/// 满分须为正数，及格线在 (0, 满分] 之间
fn validate_marks(max_marks: f64, pass_marks: f64) -> Result<(), String> {
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err("Max marks must be positive".to_string());
    }
    if !pass_marks.is_finite() || pass_marks <= 0.0 || pass_marks > max_marks {
        return Err(format!("Pass marks must be within (0, {max_marks}]"));
    }
    Ok(())
}

pub async fn create_subject(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    req: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_class(school_id, class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));

    let max_marks = req.max_marks.unwrap_or(DEFAULT_MAX_MARKS);
    let pass_marks = req.pass_marks.unwrap_or(DEFAULT_PASS_MARKS);
    if let Err(msg) = validate_required_text(&req.name, "Subject name", 100)
        .and_then(|_| validate_marks(max_marks, pass_marks))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let subject = try_or_respond!(stored(
        storage.create_subject(school_id, class_id, req).await,
        "Subject creation failed",
    ));

    Ok(HttpResponse::Created().json(ApiResponse::success(
        subject,
        "Subject created successfully",
    )))
}

pub async fn list_subjects(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_class(school_id, class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));

    match storage.list_subjects(school_id, class_id).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(subjects),
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve subjects", e)),
    }
}

pub async fn update_subject(
    service: &ClassService,
    request: &HttpRequest,
    subject_id: i64,
    update: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let subject = try_or_respond!(found(
        storage.get_subject(school_id, subject_id).await,
        ErrorCode::SubjectNotFound,
        "Subject not found",
    ));

    if let Some(name) = &update.name
        && let Err(msg) = validate_required_text(name, "Subject name", 100)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    let max_marks = update.max_marks.unwrap_or(subject.max_marks);
    let pass_marks = update.pass_marks.unwrap_or(subject.pass_marks);
    if let Err(msg) = validate_marks(max_marks, pass_marks) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_subject(school_id, subject_id, update).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subject,
            "Subject updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error("Subject update failed", e)),
    }
}

pub async fn delete_subject(
    service: &ClassService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_subject(school_id, subject_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error("Subject deletion failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_rules() {
        assert!(validate_marks(100.0, 33.0).is_ok());
        assert!(validate_marks(100.0, 100.0).is_ok());
        assert!(validate_marks(0.0, 0.0).is_err());
        assert!(validate_marks(50.0, 60.0).is_err());
        assert!(validate_marks(50.0, 0.0).is_err());
    }
}
