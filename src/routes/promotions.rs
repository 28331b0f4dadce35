use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::promotions::requests::{PromotionRecordQuery, PromotionRequest};
use crate::services::PromotionService;

// 懒加载的全局 PROMOTION_SERVICE 实例
static PROMOTION_SERVICE: Lazy<PromotionService> = Lazy::new(PromotionService::new_lazy);

pub async fn preview_promotion(
    req: HttpRequest,
    promotion_data: web::Json<PromotionRequest>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .preview(&req, promotion_data.into_inner())
        .await
}

pub async fn apply_promotion(
    req: HttpRequest,
    promotion_data: web::Json<PromotionRequest>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .apply(&req, promotion_data.into_inner())
        .await
}

pub async fn list_records(
    req: HttpRequest,
    query: web::Query<PromotionRecordQuery>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .list_records(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_promotion_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/promotions")
            .wrap(middlewares::RequireSchool)
            .service(web::resource("").route(web::get().to(list_records)))
            .service(web::resource("/preview").route(web::post().to(preview_promotion)))
            .service(web::resource("/apply").route(web::post().to(apply_promotion))),
    );
}
