use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::notices::requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest};
use crate::services::NoticeService;
use crate::utils::SafeNoticeIdI64;

// 懒加载的全局 NOTICE_SERVICE 实例
static NOTICE_SERVICE: Lazy<NoticeService> = Lazy::new(NoticeService::new_lazy);

pub async fn list_notices(
    req: HttpRequest,
    query: web::Query<NoticeListQuery>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.list_notices(&req, query.into_inner()).await
}

pub async fn create_notice(
    req: HttpRequest,
    notice_data: web::Json<CreateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE
        .create_notice(&req, notice_data.into_inner())
        .await
}

pub async fn get_notice(req: HttpRequest, notice_id: SafeNoticeIdI64) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.get_notice(&req, notice_id.0).await
}

pub async fn update_notice(
    req: HttpRequest,
    notice_id: SafeNoticeIdI64,
    update_data: web::Json<UpdateNoticeRequest>,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE
        .update_notice(&req, notice_id.0, update_data.into_inner())
        .await
}

pub async fn delete_notice(req: HttpRequest, notice_id: SafeNoticeIdI64) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.delete_notice(&req, notice_id.0).await
}

// 配置路由
pub fn configure_notice_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notices")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_notices))
                    .route(web::post().to(create_notice)),
            )
            .service(
                web::resource("/{notice_id}")
                    .route(web::get().to(get_notice))
                    .route(web::put().to(update_notice))
                    .route(web::delete().to(delete_notice)),
            ),
    );
}
