use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{found, require_school_id, try_or_respond};

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let student = try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Student information retrieved successfully",
    )))
}
