use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{found, try_or_respond};

pub async fn get_school(
    service: &SchoolService,
    request: &HttpRequest,
    school_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let school = try_or_respond!(found(
        storage.get_school_by_id(school_id).await,
        ErrorCode::SchoolNotFound,
        "School not found",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        school,
        "School information retrieved successfully",
    )))
}
