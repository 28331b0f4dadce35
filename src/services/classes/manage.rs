use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    classes::{
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassDetail,
    },
};
use crate::services::{
    bad_request, found, not_found, require_school_id, storage_error, stored, try_or_respond,
};
use crate::utils::validate::validate_required_text;

fn validate_class_fields(
    name: Option<&str>,
    grade_level: Option<i32>,
    capacity: Option<i32>,
) -> Result<(), String> {
    if let Some(name) = name {
        validate_required_text(name, "Class name", 50)?;
    }
    if grade_level.is_some_and(|level| level < 0) {
        return Err("Grade level must not be negative".to_string());
    }
    if capacity.is_some_and(|cap| cap <= 0) {
        return Err("Capacity must be positive".to_string());
    }
    Ok(())
}

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    req: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) = validate_class_fields(Some(&req.name), Some(req.grade_level), req.capacity) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    let class = try_or_respond!(stored(
        storage.create_class(school_id, req).await,
        "Class creation failed",
    ));

    info!("Class {} created in school {}", class.display_name(), school_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_classes(school_id, query).await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(classes),
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve class list", e)),
    }
}

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let class = try_or_respond!(found(
        storage.get_class(school_id, class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));
    let student_count = try_or_respond!(stored(
        storage.count_active_students(school_id, class_id).await,
        "Failed to count class students",
    ));
    let subjects = try_or_respond!(stored(
        storage.list_subjects(school_id, class_id).await,
        "Failed to retrieve class subjects",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetail {
            class,
            student_count,
            subjects,
        },
        "Class information retrieved successfully",
    )))
}

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if let Err(msg) =
        validate_class_fields(update.name.as_deref(), update.grade_level, update.capacity)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_class(school_id, class_id, update).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error("Class update failed", e)),
    }
}

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_class(school_id, class_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error("Class deletion failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_field_rules() {
        assert!(validate_class_fields(Some("Grade 1"), Some(0), None).is_ok());
        assert!(validate_class_fields(Some("  "), Some(1), None).is_err());
        assert!(validate_class_fields(None, Some(-1), None).is_err());
        assert!(validate_class_fields(None, None, Some(0)).is_err());
        assert!(validate_class_fields(None, None, Some(40)).is_ok());
    }
}
