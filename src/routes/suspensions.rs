use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::suspensions::requests::{
    CreateSuspensionRequest, RevokeSuspensionRequest, SuspensionCheckQuery, SuspensionListQuery,
};
use crate::services::SuspensionService;
use crate::utils::{SafeStudentIdI64, SafeSuspensionIdI64};

// 懒加载的全局 SUSPENSION_SERVICE 实例
static SUSPENSION_SERVICE: Lazy<SuspensionService> = Lazy::new(SuspensionService::new_lazy);

pub async fn list_suspensions(
    req: HttpRequest,
    query: web::Query<SuspensionListQuery>,
) -> ActixResult<HttpResponse> {
    SUSPENSION_SERVICE
        .list_suspensions(&req, query.into_inner())
        .await
}

pub async fn create_suspension(
    req: HttpRequest,
    suspension_data: web::Json<CreateSuspensionRequest>,
) -> ActixResult<HttpResponse> {
    SUSPENSION_SERVICE
        .create_suspension(&req, suspension_data.into_inner())
        .await
}

pub async fn revoke_suspension(
    req: HttpRequest,
    suspension_id: SafeSuspensionIdI64,
    revoke_data: web::Json<RevokeSuspensionRequest>,
) -> ActixResult<HttpResponse> {
    SUSPENSION_SERVICE
        .revoke_suspension(&req, suspension_id.0, revoke_data.into_inner())
        .await
}

// 挂在 /students 作用域下
pub async fn check_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<SuspensionCheckQuery>,
) -> ActixResult<HttpResponse> {
    SUSPENSION_SERVICE
        .check_student(&req, student_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_suspension_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/suspensions")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_suspensions))
                    .route(web::post().to(create_suspension)),
            )
            .service(
                web::resource("/{suspension_id}/revoke")
                    .route(web::put().to(revoke_suspension)),
            ),
    );
}
