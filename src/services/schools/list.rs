use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, schools::requests::SchoolListQuery};
use crate::services::storage_error;

pub async fn list_schools(
    service: &SchoolService,
    request: &HttpRequest,
    query: SchoolListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_schools_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "School list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve school list", e)),
    }
}
