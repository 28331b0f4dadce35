pub mod list;
pub mod record;
pub mod report_card;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::marks::requests::{MarkListQuery, RecordMarksRequest, ReportCardQuery};
use crate::storage::Storage;

pub struct MarkService {
    storage: Option<Arc<dyn Storage>>,
}

impl MarkService {
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

    // 录入某场考试某科的成绩
    pub async fn record_marks(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        req: RecordMarksRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_marks(self, request, exam_id, req).await
    }

    pub async fn list_marks(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        query: MarkListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_marks(self, request, exam_id, query).await
    }

    pub async fn get_report_card(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: ReportCardQuery,
    ) -> ActixResult<HttpResponse> {
        report_card::get_report_card(self, request, student_id, query).await
    }
}
