use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, class_with_room, validate_student_fields};
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, try_or_respond,
};

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    update: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) = validate_student_fields(
        None,
        update.first_name.as_deref(),
        update.last_name.as_deref(),
        update.guardian_phone.as_deref(),
        update.email.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let student = try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    // 转班时检查目标班级容量
    if let Some(class_id) = update.class_id
        && class_id != student.class_id
    {
        try_or_respond!(class_with_room(&storage, school_id, class_id).await);
    }

    match storage.update_student(school_id, student_id, update).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student information updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error("Student update failed", e)),
    }
}
