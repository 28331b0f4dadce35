pub mod mark;
pub mod sheet;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceSheetQuery, AttendanceSummaryQuery, MarkAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
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

    // 按班级批量点名
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        req: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, request, req).await
    }

    pub async fn get_sheet(
        &self,
        request: &HttpRequest,
        query: AttendanceSheetQuery,
    ) -> ActixResult<HttpResponse> {
        sheet::get_sheet(self, request, query).await
    }

    pub async fn get_student_summary(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: AttendanceSummaryQuery,
    ) -> ActixResult<HttpResponse> {
        summary::get_student_summary(self, request, student_id, query).await
    }
}
