use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StudentService, class_with_room, validate_student_fields};
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::services::{bad_request, found, require_school_id, stored, try_or_respond};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    req: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) = validate_student_fields(
        Some(&req.admission_no),
        Some(&req.first_name),
        Some(&req.last_name),
        req.guardian_phone.as_deref(),
        req.email.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    try_or_respond!(class_with_room(&storage, school_id, req.class_id).await);
    if let Some(house_id) = req.house_id {
        try_or_respond!(found(
            storage.get_house(school_id, house_id).await,
            ErrorCode::HouseNotFound,
            "House not found",
        ));
    }

    let student = try_or_respond!(stored(
        storage.create_student(school_id, req).await,
        "Student creation failed",
    ));

    info!(
        "Student {} ({}) enrolled in class {}",
        student.full_name(),
        student.admission_no,
        student.class_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        student,
        "Student created successfully",
    )))
}
