use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::models::{ApiResponse, ErrorCode, ItemsResponse, marks::requests::MarkListQuery};
use crate::services::{found, require_school_id, storage_error, try_or_respond};

pub async fn list_marks(
    service: &MarkService,
    request: &HttpRequest,
    exam_id: i64,
    query: MarkListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_exam(school_id, exam_id).await,
        ErrorCode::ExamNotFound,
        "Exam not found",
    ));

    match storage.list_marks(school_id, exam_id, query).await {
        Ok(marks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(marks),
            "Marks retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve marks", e)),
    }
}
