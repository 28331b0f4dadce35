pub mod create;
pub mod get;
pub mod list;
pub mod status;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::complaints::requests::{
    ComplaintListQuery, CreateComplaintRequest, UpdateComplaintStatusRequest,
};
use crate::storage::Storage;

pub struct ComplaintService {
    storage: Option<Arc<dyn Storage>>,
}

impl ComplaintService {
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

    pub async fn create_complaint(
        &self,
        request: &HttpRequest,
        req: CreateComplaintRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_complaint(self, request, req).await
    }

    pub async fn list_complaints(
        &self,
        request: &HttpRequest,
        query: ComplaintListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_complaints(self, request, query).await
    }

    pub async fn get_complaint(
        &self,
        request: &HttpRequest,
        complaint_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_complaint(self, request, complaint_id).await
    }

    // 状态流转：open -> in_progress -> resolved | rejected
    pub async fn update_status(
        &self,
        request: &HttpRequest,
        complaint_id: i64,
        req: UpdateComplaintStatusRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_status(self, request, complaint_id, req).await
    }
}
