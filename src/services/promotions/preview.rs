use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PromotionService, compute_preview, request_rules};
use crate::models::{ApiResponse, promotions::requests::PromotionRequest};
use crate::services::{require_school_id, try_or_respond};

pub async fn preview_promotion(
    service: &PromotionService,
    request: &HttpRequest,
    req: PromotionRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let rules = try_or_respond!(request_rules(&req));
    let (_, preview) = try_or_respond!(compute_preview(&storage, school_id, &req, &rules).await);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        preview,
        "Promotion preview computed successfully",
    )))
}
