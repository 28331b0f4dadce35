use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, CreatePaymentRequest, FeeStructureListQuery, PaymentListQuery,
    StudentFeeQuery,
};
use crate::services::FeeService;
use crate::utils::{SafeFeeIdI64, SafeStudentIdI64};

// 懒加载的全局 FEE_SERVICE 实例
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeStructureListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(&req, query.into_inner()).await
}

pub async fn create_fee(
    req: HttpRequest,
    fee_data: web::Json<CreateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(&req, fee_data.into_inner()).await
}

pub async fn delete_fee(req: HttpRequest, fee_id: SafeFeeIdI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(&req, fee_id.0).await
}

pub async fn record_payment(
    req: HttpRequest,
    payment_data: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .record_payment(&req, payment_data.into_inner())
        .await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_payments(&req, query.into_inner()).await
}

pub async fn get_student_statement(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<StudentFeeQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .get_student_statement(&req, student_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_fees))
                    .route(web::post().to(create_fee)),
            )
            .service(web::resource("/{fee_id}").route(web::delete().to(delete_fee))),
    );

    cfg.service(
        web::scope("/api/v1/payments")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(record_payment)),
            ),
    );
}
