use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, Utc};
use tracing::info;

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::{AttendanceEntry, MarkAttendanceRequest},
        responses::MarkAttendanceResponse,
    },
};
use crate::services::{bad_request, found, require_school_id, stored, try_or_respond};

/// 点名记录校验：非空、无重复、日期不晚于今天、学生均为该班在读学生
fn check_entries(
    entries: &[AttendanceEntry],
    date: NaiveDate,
    today: NaiveDate,
    class_members: &HashSet<i64>,
) -> Result<(), (ErrorCode, String)> {
    if entries.is_empty() {
        return Err((
            ErrorCode::AttendanceInvalid,
            "At least one attendance record is required".to_string(),
        ));
    }
    if date > today {
        return Err((
            ErrorCode::AttendanceInvalid,
            format!("Cannot record attendance for future date {date}"),
        ));
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.student_id) {
            return Err((
                ErrorCode::AttendanceInvalid,
                format!("Student {} appears more than once", entry.student_id),
            ));
        }
        if !class_members.contains(&entry.student_id) {
            return Err((
                ErrorCode::StudentNotInClass,
                format!("Student {} is not an active member of this class", entry.student_id),
            ));
        }
    }
    Ok(())
}

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    req: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    try_or_respond!(found(
        storage.get_class(school_id, req.class_id).await,
        ErrorCode::ClassNotFound,
        "Class not found",
    ));
    let members: HashSet<i64> = try_or_respond!(stored(
        storage.list_active_class_students(school_id, req.class_id).await,
        "Failed to load class students",
    ))
    .into_iter()
    .map(|s| s.id)
    .collect();

    if let Err((code, msg)) = check_entries(&req.records, req.date, Utc::now().date_naive(), &members) {
        return Ok(bad_request(code, msg));
    }

    let records = try_or_respond!(stored(
        storage
            .upsert_attendance(school_id, req.class_id, req.date, req.records)
            .await,
        "Failed to save attendance",
    ));

    info!(
        "Attendance for class {} on {} saved ({} records)",
        req.class_id,
        req.date,
        records.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAttendanceResponse {
            saved: records.len(),
            records,
        },
        "Attendance saved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn entry(student_id: i64) -> AttendanceEntry {
        AttendanceEntry {
            student_id,
            status: AttendanceStatus::Present,
            remark: None,
        }
    }

    #[test]
    fn test_valid_entries() {
        let members = HashSet::from([1, 2, 3]);
        assert!(check_entries(&[entry(1), entry(3)], day(5), day(5), &members).is_ok());
    }

    #[test]
    fn test_rejects_future_empty_and_duplicates() {
        let members = HashSet::from([1, 2]);
        assert!(check_entries(&[], day(5), day(5), &members).is_err());
        assert!(check_entries(&[entry(1)], day(6), day(5), &members).is_err());
        let (code, _) = check_entries(&[entry(1), entry(1)], day(5), day(5), &members).unwrap_err();
        assert_eq!(code, ErrorCode::AttendanceInvalid);
    }

    #[test]
    fn test_rejects_outsider() {
        let members = HashSet::from([1, 2]);
        let (code, _) = check_entries(&[entry(9)], day(5), day(5), &members).unwrap_err();
        assert_eq!(code, ErrorCode::StudentNotInClass);
    }
}
