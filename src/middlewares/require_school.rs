/*!
 * 学校（租户）解析中间件
 *
 * 所有租户数据的路由都需要通过 `X-School-Id` 请求头指明所属学校。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireSchool;
 *
 * cfg.service(
 *     web::scope("/api/v1/students")
 *         .wrap(RequireSchool)
 *         .route("", web::get().to(list_students)),
 * );
 * ```
 *
 * 处理程序中通过 `RequireSchool::extract_school_id(&req)` 取出学校 ID。
 *
 * ## 处理流程
 *
 * 1. 读取 `X-School-Id`，缺失或不是正整数时返回 400
 * 2. 优先从缓存读取学校，未命中再查询存储并写回缓存
 * 3. 学校不存在时返回 404
 * 4. 将学校信息写入请求扩展，继续处理请求
 */

use crate::cache::{ObjectCache, traits::{get_json, insert_json}};
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, schools::entities::School};
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

pub const SCHOOL_HEADER: &str = "X-School-Id";

#[derive(Clone)]
pub struct RequireSchool;

/// 请求头解析失败或学校不存在
enum SchoolRejection {
    Missing(String),
    NotFound(i64),
    Storage(String),
}

pub fn school_cache_key(school_id: i64) -> String {
    format!("school:{school_id}")
}

fn create_error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    if status == StatusCode::NO_CONTENT {
        return HttpResponse::build(status).finish();
    }
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

fn parse_school_header(value: Option<&str>) -> Result<i64, String> {
    let raw = value.ok_or_else(|| format!("Missing {SCHOOL_HEADER} header"))?;
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid {SCHOOL_HEADER} header: '{raw}'")),
    }
}

async fn resolve_school(req: &ServiceRequest) -> Result<School, SchoolRejection> {
    let school_id = parse_school_header(
        req.headers()
            .get(SCHOOL_HEADER)
            .and_then(|h| h.to_str().ok()),
    )
    .map_err(SchoolRejection::Missing)?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let key = school_cache_key(school_id);
    if let Some(school) = get_json::<School>(cache.as_ref(), &key).await {
        return Ok(school);
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let school = storage
        .get_school_by_id(school_id)
        .await
        .map_err(|e| SchoolRejection::Storage(e.to_string()))?
        .ok_or(SchoolRejection::NotFound(school_id))?;

    insert_json(cache.as_ref(), &key, &school, AppConfig::get().cache.default_ttl).await;

    Ok(school)
}

impl<S, B> Transform<S, ServiceRequest> for RequireSchool
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSchoolMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSchoolMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSchoolMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSchoolMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let (status, code, message) = match resolve_school(&req).await {
                Ok(school) => {
                    debug!("Request to {} scoped to school {}", req.path(), school.id);
                    req.extensions_mut().insert(school);
                    let res = srv.call(req).await?.map_into_left_body();
                    return Ok(res);
                }
                Err(SchoolRejection::Missing(msg)) => {
                    info!("Rejected request to {}: {}", req.path(), msg);
                    (StatusCode::BAD_REQUEST, ErrorCode::SchoolHeaderMissing, msg)
                }
                Err(SchoolRejection::NotFound(id)) => (
                    StatusCode::NOT_FOUND,
                    ErrorCode::SchoolNotFound,
                    format!("School {id} not found"),
                ),
                Err(SchoolRejection::Storage(msg)) => {
                    warn!("Failed to resolve school for {}: {}", req.path(), msg);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Failed to resolve school".to_string(),
                    )
                }
            };

            Ok(req.into_response(
                create_error_response(status, code, &message).map_into_right_body(),
            ))
        })
    }
}

impl RequireSchool {
    /// 从请求扩展中取出当前学校
    /// 此函数应该在应用了 RequireSchool 中间件的路由处理程序中使用
    pub fn extract_school(req: &actix_web::HttpRequest) -> Option<School> {
        req.extensions().get::<School>().cloned()
    }

    /// 从请求扩展中取出当前学校 ID
    pub fn extract_school_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<School>().map(|school| school.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_school_header() {
        assert_eq!(parse_school_header(Some("12")), Ok(12));
        assert_eq!(parse_school_header(Some(" 7 ")), Ok(7));
        assert!(parse_school_header(None).is_err());
        assert!(parse_school_header(Some("0")).is_err());
        assert!(parse_school_header(Some("-3")).is_err());
        assert!(parse_school_header(Some("abc")).is_err());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(school_cache_key(42), "school:42");
    }
}
