use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicYearService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    academic_years::requests::{CreateAcademicYearRequest, UpdateAcademicYearRequest},
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::{validate_date_range, validate_required_text};

pub async fn create_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    req: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) = validate_required_text(&req.name, "Academic year name", 50) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Err(msg) = validate_date_range(req.start_date, req.end_date, true) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let year = try_or_respond!(stored(
        storage.create_academic_year(school_id, req).await,
        "Academic year creation failed",
    ));

    Ok(HttpResponse::Created().json(ApiResponse::success(
        year,
        "Academic year created successfully",
    )))
}

pub async fn list_years(
    service: &AcademicYearService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_academic_years(school_id).await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(years),
            "Academic years retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve academic years", e)),
    }
}

pub async fn get_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let year = try_or_respond!(found(
        storage.get_academic_year(school_id, year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Academic year retrieved successfully",
    )))
}

pub async fn get_current_year(
    service: &AcademicYearService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let year = try_or_respond!(found(
        storage.get_current_academic_year(school_id).await,
        ErrorCode::NoCurrentAcademicYear,
        "No current academic year",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Current academic year retrieved successfully",
    )))
}

pub async fn update_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
    update: UpdateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let existing = try_or_respond!(found(
        storage.get_academic_year(school_id, year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    if let Some(name) = &update.name
        && let Err(msg) = validate_required_text(name, "Academic year name", 50)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    // 与未修改的一端合并后再校验
    let start = update.start_date.unwrap_or(existing.start_date);
    let end = update.end_date.unwrap_or(existing.end_date);
    if let Err(msg) = validate_date_range(start, end, true) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_academic_year(school_id, year_id, update).await {
        Ok(Some(year)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            year,
            "Academic year updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(storage_error("Academic year update failed", e)),
    }
}

pub async fn delete_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_academic_year(school_id, year_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Academic year deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        Err(e) => Ok(storage_error("Academic year deletion failed", e)),
    }
}

pub async fn activate_year(
    service: &AcademicYearService,
    request: &HttpRequest,
    year_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let year = try_or_respond!(found(
        storage.activate_academic_year(school_id, year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    info!("School {} switched current academic year to {}", school_id, year.name);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Academic year activated successfully",
    )))
}
