//! 路径参数提取器
//!
//! 从路由路径中提取正整数 id，非法时直接返回统一格式的 400 响应。

use actix_web::{HttpResponse, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// 解析路径中的 id，必须为正整数
pub fn parse_positive_id(raw: Option<&str>, param: &str) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter '{param}'"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid path parameter '{param}': {raw}")),
    }
}

pub fn bad_path_error(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

/// 定义安全的 i64 路径提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = futures_util::future::Ready<::std::result::Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                futures_util::future::ready(
                    $crate::utils::extractor::parse_positive_id(req.match_info().get($param), $param)
                        .map($name)
                        .map_err($crate::utils::extractor::bad_path_error),
                )
            }
        }
    };
}

define_safe_i64_extractor!(SafeSchoolIdI64, "school_id");
define_safe_i64_extractor!(SafeAcademicYearIdI64, "year_id");
define_safe_i64_extractor!(SafeTermIdI64, "term_id");
define_safe_i64_extractor!(SafeExamIdI64, "exam_id");
define_safe_i64_extractor!(SafeClassIdI64, "class_id");
define_safe_i64_extractor!(SafeSubjectIdI64, "subject_id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");
define_safe_i64_extractor!(SafeFeeIdI64, "fee_id");
define_safe_i64_extractor!(SafeNoticeIdI64, "notice_id");
define_safe_i64_extractor!(SafeComplaintIdI64, "complaint_id");
define_safe_i64_extractor!(SafeHouseIdI64, "house_id");
define_safe_i64_extractor!(SafeSuspensionIdI64, "suspension_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::FromRequest;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42"), "id"), Ok(42));
        assert!(parse_positive_id(Some("0"), "id").is_err());
        assert!(parse_positive_id(Some("-3"), "id").is_err());
        assert!(parse_positive_id(Some("abc"), "id").is_err());
        assert!(parse_positive_id(None, "id").is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_match_info() {
        let req = TestRequest::default()
            .param("student_id", "17")
            .to_http_request();
        let extracted = SafeStudentIdI64::extract(&req).await.unwrap();
        assert_eq!(extracted.0, 17);
    }

    #[actix_web::test]
    async fn test_extractor_rejects_invalid() {
        let req = TestRequest::default()
            .param("student_id", "x1")
            .to_http_request();
        let result = SafeStudentIdI64::extract(&req).await;
        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
