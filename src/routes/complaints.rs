use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::complaints::requests::{
    ComplaintListQuery, CreateComplaintRequest, UpdateComplaintStatusRequest,
};
use crate::services::ComplaintService;
use crate::utils::SafeComplaintIdI64;

// 懒加载的全局 COMPLAINT_SERVICE 实例
static COMPLAINT_SERVICE: Lazy<ComplaintService> = Lazy::new(ComplaintService::new_lazy);

pub async fn list_complaints(
    req: HttpRequest,
    query: web::Query<ComplaintListQuery>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE
        .list_complaints(&req, query.into_inner())
        .await
}

pub async fn create_complaint(
    req: HttpRequest,
    complaint_data: web::Json<CreateComplaintRequest>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE
        .create_complaint(&req, complaint_data.into_inner())
        .await
}

pub async fn get_complaint(
    req: HttpRequest,
    complaint_id: SafeComplaintIdI64,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE.get_complaint(&req, complaint_id.0).await
}

pub async fn update_status(
    req: HttpRequest,
    complaint_id: SafeComplaintIdI64,
    status_data: web::Json<UpdateComplaintStatusRequest>,
) -> ActixResult<HttpResponse> {
    COMPLAINT_SERVICE
        .update_status(&req, complaint_id.0, status_data.into_inner())
        .await
}

// 配置路由
pub fn configure_complaint_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/complaints")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_complaints))
                    .route(web::post().to(create_complaint)),
            )
            .service(web::resource("/{complaint_id}").route(web::get().to(get_complaint)))
            .service(
                web::resource("/{complaint_id}/status").route(web::put().to(update_status)),
            ),
    );
}
