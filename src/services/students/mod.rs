pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::{
    ErrorCode,
    classes::entities::Class,
    students::requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
};
use crate::services::{conflict, found, stored};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        req: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, req).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        update: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, update).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, student_id).await
    }
}

/// 读取班级并确认仍有空位
pub(crate) async fn class_with_room(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    let class = found(
        storage.get_class(school_id, class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    )?;

    if let Some(capacity) = class.capacity {
        let enrolled = stored(
            storage.count_active_students(school_id, class_id).await,
            "Failed to count class students",
        )?;
        if enrolled >= i64::from(capacity) {
            return Err(conflict(
                ErrorCode::ClassFull,
                format!("Class {} is full ({capacity} students)", class.display_name()),
            ));
        }
    }

    Ok(class)
}

/// 学生联系方式与学号校验
pub(crate) fn validate_student_fields(
    admission_no: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    guardian_phone: Option<&str>,
    email: Option<&str>,
) -> Result<(), String> {
    use crate::utils::validate::{
        validate_admission_no, validate_email, validate_phone, validate_required_text,
    };

    if let Some(admission_no) = admission_no {
        validate_admission_no(admission_no)?;
    }
    if let Some(first_name) = first_name {
        validate_required_text(first_name, "First name", 50)?;
    }
    if let Some(last_name) = last_name {
        validate_required_text(last_name, "Last name", 50)?;
    }
    if let Some(phone) = guardian_phone {
        validate_phone(phone)?;
    }
    if let Some(email) = email {
        validate_email(email)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_field_rules() {
        assert!(validate_student_fields(Some("ADM-001"), Some("Ana"), Some("Lee"), None, None).is_ok());
        assert!(validate_student_fields(Some(""), None, None, None, None).is_err());
        assert!(validate_student_fields(None, Some(" "), None, None, None).is_err());
        assert!(validate_student_fields(None, None, None, Some("abc"), None).is_err());
        assert!(validate_student_fields(None, None, None, None, Some("not-an-email")).is_err());
    }
}
