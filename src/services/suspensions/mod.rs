pub mod check;
pub mod create;
pub mod list;
pub mod revoke;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::suspensions::requests::{
    CreateSuspensionRequest, RevokeSuspensionRequest, SuspensionCheckQuery, SuspensionListQuery,
};
use crate::storage::Storage;

pub struct SuspensionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SuspensionService {
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

    pub async fn create_suspension(
        &self,
        request: &HttpRequest,
        req: CreateSuspensionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_suspension(self, request, req).await
    }

    pub async fn list_suspensions(
        &self,
        request: &HttpRequest,
        query: SuspensionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_suspensions(self, request, query).await
    }

    pub async fn revoke_suspension(
        &self,
        request: &HttpRequest,
        suspension_id: i64,
        req: RevokeSuspensionRequest,
    ) -> ActixResult<HttpResponse> {
        revoke::revoke_suspension(self, request, suspension_id, req).await
    }

    // 查询学生在某日是否处于停学
    pub async fn check_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: SuspensionCheckQuery,
    ) -> ActixResult<HttpResponse> {
        check::check_student(self, request, student_id, query).await
    }
}
