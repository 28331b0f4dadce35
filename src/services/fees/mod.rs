pub mod payments;
pub mod statement;
pub mod structures;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::fees::requests::{
    CreateFeeStructureRequest, CreatePaymentRequest, FeeStructureListQuery, PaymentListQuery,
    StudentFeeQuery,
};
use crate::storage::Storage;

pub struct FeeService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeeService {
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

    pub async fn create_fee(
        &self,
        request: &HttpRequest,
        req: CreateFeeStructureRequest,
    ) -> ActixResult<HttpResponse> {
        structures::create_fee(self, request, req).await
    }

    pub async fn list_fees(
        &self,
        request: &HttpRequest,
        query: FeeStructureListQuery,
    ) -> ActixResult<HttpResponse> {
        structures::list_fees(self, request, query).await
    }

    pub async fn delete_fee(&self, request: &HttpRequest, fee_id: i64) -> ActixResult<HttpResponse> {
        structures::delete_fee(self, request, fee_id).await
    }

    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        req: CreatePaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payments::record_payment(self, request, req).await
    }

    pub async fn list_payments(
        &self,
        request: &HttpRequest,
        query: PaymentListQuery,
    ) -> ActixResult<HttpResponse> {
        payments::list_payments(self, request, query).await
    }

    // 学生某学年的缴费明细
    pub async fn get_student_statement(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: StudentFeeQuery,
    ) -> ActixResult<HttpResponse> {
        statement::get_student_statement(self, request, student_id, query).await
    }
}
