use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::SuspensionService;
use crate::models::{
    ApiResponse, ErrorCode,
    suspensions::{requests::SuspensionCheckQuery, responses::SuspensionCheck},
};
use crate::services::{found, require_school_id, stored, try_or_respond};

pub async fn check_student(
    service: &SuspensionService,
    request: &HttpRequest,
    student_id: i64,
    query: SuspensionCheckQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let suspension = try_or_respond!(stored(
        storage.find_active_suspension(school_id, student_id, date).await,
        "Failed to check suspension",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SuspensionCheck {
            student_id,
            date,
            suspended: suspension.is_some(),
            suspension,
        },
        "Suspension status retrieved successfully",
    )))
}
