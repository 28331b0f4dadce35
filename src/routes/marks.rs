use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::marks::requests::{MarkListQuery, RecordMarksRequest, ReportCardQuery};
use crate::services::MarkService;
use crate::utils::{SafeExamIdI64, SafeStudentIdI64};

// 懒加载的全局 MARK_SERVICE 实例
static MARK_SERVICE: Lazy<MarkService> = Lazy::new(MarkService::new_lazy);

// 以下处理程序挂在 /exams 与 /students 作用域下
pub async fn record_marks(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    marks_data: web::Json<RecordMarksRequest>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE
        .record_marks(&req, exam_id.0, marks_data.into_inner())
        .await
}

pub async fn list_marks(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    query: web::Query<MarkListQuery>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE
        .list_marks(&req, exam_id.0, query.into_inner())
        .await
}

pub async fn get_report_card(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<ReportCardQuery>,
) -> ActixResult<HttpResponse> {
    MARK_SERVICE
        .get_report_card(&req, student_id.0, query.into_inner())
        .await
}
