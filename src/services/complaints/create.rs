use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ComplaintService;
use crate::models::{ApiResponse, ErrorCode, complaints::requests::CreateComplaintRequest};
use crate::services::{bad_request, found, require_school_id, storage_error, try_or_respond};
use crate::utils::validate::validate_required_text;

fn validate_complaint(req: &CreateComplaintRequest) -> Result<(), String> {
    validate_required_text(&req.complainant_name, "Complainant name", 100)?;
    validate_required_text(&req.title, "Complaint title", 200)?;
    validate_required_text(&req.description, "Complaint description", 5000)
}

pub async fn create_complaint(
    service: &ComplaintService,
    request: &HttpRequest,
    req: CreateComplaintRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Err(msg) = validate_complaint(&req) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    if let Some(student_id) = req.student_id {
        try_or_respond!(found(
            storage.get_student(school_id, student_id).await,
            ErrorCode::StudentNotFound,
            "Student not found",
        ));
    }

    match storage.create_complaint(school_id, req).await {
        Ok(complaint) => {
            info!(
                "Complaint {} filed in school {} ({})",
                complaint.id, school_id, complaint.category
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                complaint,
                "Complaint filed successfully",
            )))
        }
        Err(e) => Ok(storage_error("Complaint creation failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::complaints::entities::ComplaintCategory;

    fn request(name: &str, title: &str, description: &str) -> CreateComplaintRequest {
        CreateComplaintRequest {
            student_id: None,
            complainant_name: name.to_string(),
            category: ComplaintCategory::Transport,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_validate_complaint() {
        assert!(validate_complaint(&request("Parent", "Late bus", "Bus 4 is late daily")).is_ok());
        assert!(validate_complaint(&request("", "Late bus", "Bus 4 is late daily")).is_err());
        assert!(validate_complaint(&request("Parent", "Late bus", "  ")).is_err());
    }
}
