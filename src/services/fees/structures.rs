use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeeService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    fees::requests::{CreateFeeStructureRequest, FeeStructureListQuery},
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::validate_required_text;

pub async fn create_fee(
    service: &FeeService,
    request: &HttpRequest,
    req: CreateFeeStructureRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) = validate_required_text(&req.title, "Fee title", 100) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if req.amount <= 0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Fee amount must be positive",
        ));
    }

    let storage = service.get_storage(request);
    try_or_respond!(found(
        storage.get_class(school_id, req.class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));
    try_or_respond!(found(
        storage.get_academic_year(school_id, req.academic_year_id).await,
        ErrorCode::AcademicYearNotFound,
        "Academic year not found",
    ));

    let fee = try_or_respond!(stored(
        storage.create_fee_structure(school_id, req).await,
        "Fee creation failed",
    ));

    Ok(HttpResponse::Created().json(ApiResponse::success(fee, "Fee created successfully")))
}

pub async fn list_fees(
    service: &FeeService,
    request: &HttpRequest,
    query: FeeStructureListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_fee_structures(school_id, query).await {
        Ok(fees) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(fees),
            "Fee list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve fee list", e)),
    }
}

pub async fn delete_fee(
    service: &FeeService,
    request: &HttpRequest,
    fee_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_fee_structure(school_id, fee_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Fee deleted successfully"))),
        Ok(false) => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => Ok(storage_error("Fee deletion failed", e)),
    }
}
