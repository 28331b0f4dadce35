use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::HouseService;
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode, ItemsResponse,
    houses::requests::{CreateHouseRequest, UpdateHouseRequest},
};
use crate::services::{
    bad_request, conflict, not_found, require_school_id, storage_error, try_or_respond,
};
use crate::utils::validate::{validate_color, validate_required_text};

fn validate_house_fields(name: Option<&str>, color: Option<&str>) -> Result<(), String> {
    if let Some(name) = name {
        validate_required_text(name, "House name", 50)?;
    }
    if let Some(color) = color {
        validate_color(color)?;
    }
    Ok(())
}

pub async fn list_houses(service: &HouseService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_houses_with_counts(school_id).await {
        Ok(houses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ItemsResponse::new(houses),
            "House list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve house list", e)),
    }
}

pub async fn create_house(
    service: &HouseService,
    request: &HttpRequest,
    req: CreateHouseRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Err(msg) = validate_house_fields(Some(&req.name), req.color.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.create_house(school_id, req).await {
        Ok(house) => {
            info!("House {} created for school {}", house.name, school_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                house,
                "House created successfully",
            )))
        }
        Err(SchoolHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::Conflict,
            "A house with this name already exists",
        )),
        Err(e) => Ok(storage_error("House creation failed", e)),
    }
}

pub async fn update_house(
    service: &HouseService,
    request: &HttpRequest,
    house_id: i64,
    update: UpdateHouseRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Err(msg) = validate_house_fields(update.name.as_deref(), update.color.as_deref()) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    match storage.update_house(school_id, house_id, update).await {
        Ok(Some(house)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            house,
            "House updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::HouseNotFound, "House not found")),
        Err(e) => Ok(storage_error("House update failed", e)),
    }
}

pub async fn delete_house(
    service: &HouseService,
    request: &HttpRequest,
    house_id: i64,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.delete_house(school_id, house_id).await {
        Ok(true) => {
            info!("House {} deleted", house_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("House deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::HouseNotFound, "House not found")),
        Err(e) => Ok(storage_error("House deletion failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_house_fields() {
        assert!(validate_house_fields(Some("Falcon"), Some("#1E90FF")).is_ok());
        assert!(validate_house_fields(None, None).is_ok());
        assert!(validate_house_fields(Some("  "), None).is_err());
        assert!(validate_house_fields(Some("Falcon"), Some("blue")).is_err());
    }
}
