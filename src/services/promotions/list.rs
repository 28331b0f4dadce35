use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PromotionService;
use crate::models::{ApiResponse, ItemsResponse, promotions::requests::PromotionRecordQuery};
use crate::services::{require_school_id, storage_error, try_or_respond};

pub async fn list_records(
    service: &PromotionService,
    request: &HttpRequest,
    query: PromotionRecordQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_promotion_records(school_id, query).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(records),
            "Promotion records retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve promotion records", e)),
    }
}
