use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicYearService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    academic_years::requests::{CreateTermRequest, UpdateTermRequest},
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::{validate_date_range, validate_required_text, validate_within};

pub async fn create_term(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
    req: CreateTermRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let year = try_or_respond!(found(
        storage.get_academic_year(school_id, year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    if let Err(msg) = validate_required_text(&req.name, "Term name", 50) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_date_range(req.start_date, req.end_date, true)
        .and_then(|_| validate_within(req.start_date, req.end_date, year.start_date, year.end_date))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let term = try_or_respond!(stored(
        storage.create_term(school_id, year_id, req).await,
        "Term creation failed",
    ));

    Ok(HttpResponse::Created().json(ApiResponse::success(term, "Term created successfully")))
}

pub async fn list_terms(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_academic_year(school_id, year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    match storage.list_terms(school_id, year_id).await {
        Ok(terms) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(terms),
            "Terms retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve terms", e)),
    }
}

pub async fn update_term(
    service: &AcademicYearService,
    request: &HttpRequest,
    term_id: i64,
    update: UpdateTermRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let term = try_or_respond!(found(
        storage.get_term(school_id, term_id).await,
        ErrorCode::TermNotFound,
        "Term not found",
    ));
    let year = try_or_respond!(found(
        storage.get_academic_year(school_id, term.academic_year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    if let Some(name) = &update.name
        && let Err(msg) = validate_required_text(name, "Term name", 50)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    let start = update.start_date.unwrap_or(term.start_date);
    let end = update.end_date.unwrap_or(term.end_date);
    if let Err(msg) = validate_date_range(start, end, true)
        .and_then(|_| validate_within(start, end, year.start_date, year.end_date))
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_term(school_id, term_id, update).await {
        Ok(Some(term)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            term,
            "Term updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => Ok(storage_error("Term update failed", e)),
    }
}

pub async fn delete_term(
    service: &AcademicYearService,
    request: &HttpRequest,
    term_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_term(school_id, term_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Term deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::TermNotFound, "Term not found")),
        Err(e) => Ok(storage_error("Term deletion failed", e)),
    }
}
