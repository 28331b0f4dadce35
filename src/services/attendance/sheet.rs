use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{requests::AttendanceSheetQuery, responses::AttendanceSheet},
};
use crate::services::{found, require_school_id, stored, try_or_respond};

pub async fn get_sheet(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceSheetQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_class(school_id, query.class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));

    let records = try_or_respond!(stored(
        storage
            .list_class_attendance(school_id, query.class_id, query.date)
            .await,
        "Failed to load attendance",
    ));
    let students = try_or_respond!(stored(
        storage.list_active_class_students(school_id, query.class_id).await,
        "Failed to load class students",
    ));

    let marked: HashSet<i64> = records.iter().map(|r| r.student_id).collect();
    let unmarked_student_ids = students
        .iter()
        .map(|s| s.id)
        .filter(|id| !marked.contains(id))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceSheet {
            class_id: query.class_id,
            date: query.date,
            records,
            unmarked_student_ids,
        },
        "Attendance sheet retrieved successfully",
    )))
}
