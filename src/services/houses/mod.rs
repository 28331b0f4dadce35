pub mod assign;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::{
    houses::requests::{AutoAssignRequest, CreateHouseRequest, UpdateHouseRequest},
    students::requests::AssignHouseRequest,
};
use crate::storage::Storage;

pub struct HouseService {
    storage: Option<Arc<dyn Storage>>,
}

impl HouseService {
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

    pub async fn list_houses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::list_houses(self, request).await
    }

    pub async fn create_house(
        &self,
        request: &HttpRequest,
        req: CreateHouseRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_house(self, request, req).await
    }

    pub async fn update_house(
        &self,
        request: &HttpRequest,
        house_id: i64,
        update: UpdateHouseRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_house(self, request, house_id, update).await
    }

    pub async fn delete_house(&self, request: &HttpRequest, house_id: i64) -> ActixResult<HttpResponse> {
        manage::delete_house(self, request, house_id).await
    }

    pub async fn set_student_house(
        &self,
        request: &HttpRequest,
        student_id: i64,
        req: AssignHouseRequest,
    ) -> ActixResult<HttpResponse> {
        assign::set_student_house(self, request, student_id, req).await
    }

    pub async fn auto_assign(
        &self,
        request: &HttpRequest,
        req: AutoAssignRequest,
    ) -> ActixResult<HttpResponse> {
        assign::auto_assign(self, request, req).await
    }
}
