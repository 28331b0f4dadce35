use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::{
    houses::requests::{AutoAssignRequest, CreateHouseRequest, UpdateHouseRequest},
    students::requests::AssignHouseRequest,
};
use crate::services::HouseService;
use crate::utils::{SafeHouseIdI64, SafeStudentIdI64};

// 懒加载的全局 HOUSE_SERVICE 实例
static HOUSE_SERVICE: Lazy<HouseService> = Lazy::new(HouseService::new_lazy);

pub async fn list_houses(req: HttpRequest) -> ActixResult<HttpResponse> {
    HOUSE_SERVICE.list_houses(&req).await
}

pub async fn create_house(
    req: HttpRequest,
    house_data: web::Json<CreateHouseRequest>,
) -> ActixResult<HttpResponse> {
    HOUSE_SERVICE.create_house(&req, house_data.into_inner()).await
}

pub async fn update_house(
    req: HttpRequest,
    house_id: SafeHouseIdI64,
    update_data: web::Json<UpdateHouseRequest>,
) -> ActixResult<HttpResponse> {
    HOUSE_SERVICE
        .update_house(&req, house_id.0, update_data.into_inner())
        .await
}

pub async fn delete_house(req: HttpRequest, house_id: SafeHouseIdI64) -> ActixResult<HttpResponse> {
    HOUSE_SERVICE.delete_house(&req, house_id.0).await
}

pub async fn auto_assign(
    req: HttpRequest,
    assign_data: Option<web::Json<AutoAssignRequest>>,
) -> ActixResult<HttpResponse> {
    // 请求体可省略
    let assign_data = assign_data.map(|data| data.into_inner()).unwrap_or_default();
    HOUSE_SERVICE.auto_assign(&req, assign_data).await
}

// 挂在 /students 作用域下
pub async fn set_student_house(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    house_data: web::Json<AssignHouseRequest>,
) -> ActixResult<HttpResponse> {
    HOUSE_SERVICE
        .set_student_house(&req, student_id.0, house_data.into_inner())
        .await
}

// 配置路由
pub fn configure_house_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/houses")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_houses))
                    .route(web::post().to(create_house)),
            )
            .service(web::resource("/auto-assign").route(web::post().to(auto_assign)))
            .service(
                web::resource("/{house_id}")
                    .route(web::put().to(update_house))
                    .route(web::delete().to(delete_house)),
            ),
    );
}
