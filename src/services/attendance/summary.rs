use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{requests::AttendanceSummaryQuery, responses::AttendanceSummary},
};
use crate::services::{bad_request, found, require_school_id, stored, try_or_respond};
use crate::utils::validate::validate_date_range;

pub async fn get_student_summary(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
    query: AttendanceSummaryQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let (Some(from), Some(to)) = (query.from, query.to)
        && let Err(msg) = validate_date_range(from, to, false)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    let statuses = try_or_respond!(stored(
        storage
            .list_student_attendance_statuses(school_id, student_id, query.from, query.to)
            .await,
        "Failed to load attendance",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSummary::from_statuses(student_id, query.from, query.to, &statuses),
        "Attendance summary retrieved successfully",
    )))
}
