pub mod exams;
pub mod terms;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::academic_years::requests::{
    CreateAcademicYearRequest, CreateExamRequest, CreateTermRequest, UpdateAcademicYearRequest,
    UpdateExamRequest, UpdateTermRequest,
};
use crate::storage::Storage;

pub struct AcademicYearService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicYearService {
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

    // 学年
    pub async fn create_year(
        &self,
        request: &HttpRequest,
        req: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_year(self, request, req).await
    }

    pub async fn list_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::list_years(self, request).await
    }

    pub async fn get_year(&self, request: &HttpRequest, year_id: i64) -> ActixResult<HttpResponse> {
        years::get_year(self, request, year_id).await
    }

    pub async fn get_current_year(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        years::get_current_year(self, request).await
    }

    pub async fn update_year(
        &self,
        request: &HttpRequest,
        year_id: i64,
        update: UpdateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::update_year(self, request, year_id, update).await
    }

    pub async fn delete_year(&self, request: &HttpRequest, year_id: i64) -> ActixResult<HttpResponse> {
        years::delete_year(self, request, year_id).await
    }

    pub async fn activate_year(
        &self,
        request: &HttpRequest,
        year_id: i64,
    ) -> ActixResult<HttpResponse> {
        years::activate_year(self, request, year_id).await
    }

    // 学期
    pub async fn create_term(
        &self,
        request: &HttpRequest,
        year_id: i64,
        req: CreateTermRequest,
    ) -> ActixResult<HttpResponse> {
        terms::create_term(self, request, year_id, req).await
    }

    pub async fn list_terms(&self, request: &HttpRequest, year_id: i64) -> ActixResult<HttpResponse> {
        terms::list_terms(self, request, year_id).await
    }

    pub async fn update_term(
        &self,
        request: &HttpRequest,
        term_id: i64,
        update: UpdateTermRequest,
    ) -> ActixResult<HttpResponse> {
        terms::update_term(self, request, term_id, update).await
    }

    pub async fn delete_term(&self, request: &HttpRequest, term_id: i64) -> ActixResult<HttpResponse> {
        terms::delete_term(self, request, term_id).await
    }

    // 考试
    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        term_id: i64,
        req: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        exams::create_exam(self, request, term_id, req).await
    }

    pub async fn list_exams(&self, request: &HttpRequest, term_id: i64) -> ActixResult<HttpResponse> {
        exams::list_exams(self, request, term_id).await
    }

    pub async fn update_exam(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> ActixResult<HttpResponse> {
        exams::update_exam(self, request, exam_id, update).await
    }

    pub async fn delete_exam(&self, request: &HttpRequest, exam_id: i64) -> ActixResult<HttpResponse> {
        exams::delete_exam(self, request, exam_id).await
    }
}
