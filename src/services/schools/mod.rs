pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::require_school::school_cache_key;
use crate::models::schools::requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest};
use crate::storage::Storage;

pub struct SchoolService {
    storage: Option<Arc<dyn Storage>>,
}

impl SchoolService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 学校信息变更后清除中间件缓存
    pub(crate) async fn evict_cache(&self, request: &HttpRequest, school_id: i64) {
        if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
            cache.remove(&school_cache_key(school_id)).await;
        }
    }

    pub async fn create_school(
        &self,
        request: &HttpRequest,
        req: CreateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, request, req).await
    }

    pub async fn list_schools(
        &self,
        request: &HttpRequest,
        query: SchoolListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, request, query).await
    }

    pub async fn get_school(&self, request: &HttpRequest, school_id: i64) -> ActixResult<HttpResponse> {
        get::get_school(self, request, school_id).await
    }

    pub async fn update_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
        update: UpdateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, request, school_id, update).await
    }

    pub async fn delete_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_school(self, request, school_id).await
    }
}

/// 学校联系方式校验，create 与 update 共用
pub(crate) fn validate_contact(
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<(), &'static str> {
    if let Some(phone) = phone {
        crate::utils::validate::validate_phone(phone)?;
    }
    if let Some(email) = email {
        crate::utils::validate::validate_email(email)?;
    }
    Ok(())
}
