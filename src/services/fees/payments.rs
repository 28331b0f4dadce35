use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::FeeService;
use crate::errors::SchoolHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    fees::requests::{CreatePaymentRequest, PaymentListQuery},
};
use crate::services::{bad_request, found, require_school_id, storage_error, try_or_respond};
use crate::utils::receipt::generate_receipt_no;

pub async fn record_payment(
    service: &FeeService,
    request: &HttpRequest,
    req: CreatePaymentRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));

    if req.amount <= 0 {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Payment amount must be positive",
        ));
    }
    let today = Utc::now().date_naive();
    let paid_on = req.paid_on.unwrap_or(today);
    if paid_on > today {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Payment date cannot be in the future",
        ));
    }

    let storage = service.get_storage(request);
    let fee = try_or_respond!(found(
        storage.get_fee_structure(school_id, req.fee_structure_id).await,
        ErrorCode::FeeNotFound,
        "Fee not found",
    ));
    try_or_respond!(found(
        storage.get_student(school_id, req.student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    let receipt_no = generate_receipt_no();
    match storage
        .record_payment(school_id, &fee, req, receipt_no, paid_on)
        .await
    {
        Ok(payment) => {
            info!(
                "Payment {} of {} recorded for student {} on fee {}",
                payment.receipt_no, payment.amount, payment.student_id, fee.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                payment,
                "Payment recorded successfully",
            )))
        }
        Err(SchoolHubError::Validation(msg)) => {
            Ok(bad_request(ErrorCode::PaymentExceedsBalance, msg))
        }
        Err(e) => Ok(storage_error("Payment recording failed", e)),
    }
}

pub async fn list_payments(
    service: &FeeService,
    request: &HttpRequest,
    query: PaymentListQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    match storage.list_payments_with_pagination(school_id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payment list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to retrieve payment list", e)),
    }
}
