pub mod academic_years;
pub mod attendance;
pub mod classes;
pub mod complaints;
pub mod fees;
pub mod houses;
pub mod marks;
pub mod notices;
pub mod promotions;
pub mod schools;
pub mod students;
pub mod suspensions;
pub mod system;

pub use academic_years::AcademicYearService;
pub use attendance::AttendanceService;
pub use classes::ClassService;
pub use complaints::ComplaintService;
pub use fees::FeeService;
pub use houses::HouseService;
pub use marks::MarkService;
pub use notices::NoticeService;
pub use promotions::PromotionService;
pub use schools::SchoolService;
pub use students::StudentService;
pub use suspensions::SuspensionService;
pub use system::SystemService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::{Result, SchoolHubError};
use crate::middlewares::RequireSchool;
use crate::models::{ApiResponse, ErrorCode};

/// 取出 `Result<T, HttpResponse>` 中的值，失败时直接返回该响应
macro_rules! try_or_respond {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(resp) => return Ok(resp),
        }
    };
}
pub(crate) use try_or_respond;

/// 当前请求所属学校，由 RequireSchool 中间件写入
pub(crate) fn require_school_id(request: &actix_web::HttpRequest) -> std::result::Result<i64, HttpResponse> {
    RequireSchool::extract_school_id(request).ok_or_else(|| {
        bad_request(
            ErrorCode::SchoolHeaderMissing,
            "School context is missing for this request",
        )
    })
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

/// 存储层错误转换为响应
///
/// 唯一约束与状态冲突返回 409，校验失败返回 400，其余记录日志后返回 500。
pub(crate) fn storage_error(context: &str, err: SchoolHubError) -> HttpResponse {
    match err {
        SchoolHubError::Conflict(msg) | SchoolHubError::InvalidState(msg) => {
            conflict(ErrorCode::Conflict, msg)
        }
        SchoolHubError::Validation(msg) => bad_request(ErrorCode::ValidationFailed, msg),
        SchoolHubError::NotFound(msg) => not_found(ErrorCode::NotFound, msg),
        other => {
            error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}

/// 查询结果为空时返回 404
pub(crate) fn found<T>(
    result: Result<Option<T>>,
    code: ErrorCode,
    message: &str,
) -> std::result::Result<T, HttpResponse> {
    match result {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(not_found(code, message)),
        Err(e) => Err(storage_error(message, e)),
    }
}

/// 存储调用失败时转换为响应
pub(crate) fn stored<T>(result: Result<T>, context: &str) -> std::result::Result<T, HttpResponse> {
    result.map_err(|e| storage_error(context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_error_status_mapping() {
        let cases = [
            (SchoolHubError::conflict("dup"), StatusCode::CONFLICT),
            (SchoolHubError::invalid_state("done"), StatusCode::CONFLICT),
            (SchoolHubError::validation("bad"), StatusCode::BAD_REQUEST),
            (SchoolHubError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                SchoolHubError::database_operation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(storage_error("ctx", err).status(), status);
        }
    }

    #[test]
    fn test_found_maps_none_to_404() {
        let resp = found::<i64>(Ok(None), ErrorCode::StudentNotFound, "Student not found")
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(found(Ok(Some(3)), ErrorCode::StudentNotFound, "x").unwrap(), 3);
    }
}
