use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceSheetQuery, AttendanceSummaryQuery, MarkAttendanceRequest,
};
use crate::services::AttendanceService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 ATTENDANCE_SERVICE 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn mark_attendance(
    req: HttpRequest,
    attendance_data: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, attendance_data.into_inner())
        .await
}

pub async fn get_sheet(
    req: HttpRequest,
    query: web::Query<AttendanceSheetQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_sheet(&req, query.into_inner()).await
}

pub async fn get_student_summary(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<AttendanceSummaryQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .get_student_summary(&req, student_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireSchool)
            .service(
                web::resource("")
                    .route(web::get().to(get_sheet))
                    .route(web::post().to(mark_attendance)),
            ),
    );
}
