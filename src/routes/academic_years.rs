use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::marks;
use crate::middlewares;
use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, CreateExamRequest, CreateTermRequest, UpdateAcademicYearRequest,
    UpdateExamRequest, UpdateTermRequest,
};
use crate::services::AcademicYearService;
use crate::utils::{SafeAcademicYearIdI64, SafeExamIdI64, SafeTermIdI64};

// 懒加载的全局 ACADEMIC_YEAR_SERVICE 实例
static ACADEMIC_YEAR_SERVICE: Lazy<AcademicYearService> =
    Lazy::new(AcademicYearService::new_lazy);

// 学年
pub async fn list_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.list_years(&req).await
}

pub async fn create_year(
    req: HttpRequest,
    year_data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .create_year(&req, year_data.into_inner())
        .await
}

pub async fn get_current_year(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.get_current_year(&req).await
}

pub async fn get_year(req: HttpRequest, year_id: SafeAcademicYearIdI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.get_year(&req, year_id.0).await
}

pub async fn update_year(
    req: HttpRequest,
    year_id: SafeAcademicYearIdI64,
    update_data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .update_year(&req, year_id.0, update_data.into_inner())
        .await
}

pub async fn delete_year(
    req: HttpRequest,
    year_id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.delete_year(&req, year_id.0).await
}

pub async fn activate_year(
    req: HttpRequest,
    year_id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.activate_year(&req, year_id.0).await
}

// 学期
pub async fn list_terms(
    req: HttpRequest,
    year_id: SafeAcademicYearIdI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.list_terms(&req, year_id.0).await
}

pub async fn create_term(
    req: HttpRequest,
    year_id: SafeAcademicYearIdI64,
    term_data: web::Json<CreateTermRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .create_term(&req, year_id.0, term_data.into_inner())
        .await
}

pub async fn update_term(
    req: HttpRequest,
    term_id: SafeTermIdI64,
    update_data: web::Json<UpdateTermRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .update_term(&req, term_id.0, update_data.into_inner())
        .await
}

pub async fn delete_term(req: HttpRequest, term_id: SafeTermIdI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.delete_term(&req, term_id.0).await
}

// 考试
pub async fn list_exams(req: HttpRequest, term_id: SafeTermIdI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.list_exams(&req, term_id.0).await
}

pub async fn create_exam(
    req: HttpRequest,
    term_id: SafeTermIdI64,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .create_exam(&req, term_id.0, exam_data.into_inner())
        .await
}

pub async fn update_exam(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    update_data: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE
        .update_exam(&req, exam_id.0, update_data.into_inner())
        .await
}

pub async fn delete_exam(req: HttpRequest, exam_id: SafeExamIdI64) -> ActixResult<HttpResponse> {
    ACADEMIC_YEAR_SERVICE.delete_exam(&req, exam_id.0).await
}

// 配置路由
pub fn configure_academic_year_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(list_years))
                    .route(web::post().to(create_year)),
            )
            // 须在 /{year_id} 之前注册
            .service(web::resource("/current").route(web::get().to(get_current_year)))
            .service(
                web::resource("/{year_id}")
                    .route(web::get().to(get_year))
                    .route(web::put().to(update_year))
                    .route(web::delete().to(delete_year)),
            )
            .service(web::resource("/{year_id}/activate").route(web::post().to(activate_year)))
            .service(
                web::resource("/{year_id}/terms")
                    .route(web::get().to(list_terms))
                    .route(web::post().to(create_term)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/terms")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("/{term_id}")
                    .route(web::put().to(update_term))
                    .route(web::delete().to(delete_term)),
            )
            .service(
                web::resource("/{term_id}/exams")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("/{exam_id}")
                    .route(web::put().to(update_exam))
                    .route(web::delete().to(delete_exam)),
            )
            .service(
                web::resource("/{exam_id}/marks")
                    .route(web::get().to(marks::list_marks))
                    .route(web::post().to(marks::record_marks)),
            ),
    );
}
