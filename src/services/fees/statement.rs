use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, Utc};

use super::FeeService;
use crate::models::{
    ApiResponse, ErrorCode,
    fees::{
        entities::{FeeStatus, FeeStructure},
        requests::{FeeStructureListQuery, StudentFeeQuery},
        responses::{StudentFeeLine, StudentFeeStatement},
    },
};
use crate::services::{found, require_school_id, stored, try_or_respond};

/// 按收费项目汇总已缴与余额
pub(crate) fn build_statement(
    student_id: i64,
    academic_year_id: i64,
    fees: Vec<FeeStructure>,
    paid: &HashMap<i64, i64>,
    today: NaiveDate,
) -> StudentFeeStatement {
    let mut statement = StudentFeeStatement {
        student_id,
        academic_year_id,
        fees: Vec::with_capacity(fees.len()),
        total_due: 0,
        total_paid: 0,
        total_balance: 0,
    };

    for fee in fees {
        let paid = paid.get(&fee.id).copied().unwrap_or(0);
        let balance = (fee.amount - paid).max(0);
        let status = FeeStatus::evaluate(fee.amount, paid, fee.due_date, today);
        statement.total_due += fee.amount;
        statement.total_paid += paid;
        statement.total_balance += balance;
        statement.fees.push(StudentFeeLine {
            fee,
            paid,
            balance,
            status,
        });
    }

    statement
}

pub async fn get_student_statement(
    service: &FeeService,
    request: &HttpRequest,
    student_id: i64,
    query: StudentFeeQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let student = try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));

    // 未指定学年时取当前学年
    let year = match query.academic_year_id {
        Some(year_id) => try_or_respond!(found(
            storage.get_academic_year(school_id, year_id).await,
            ErrorCode::AcademicYearNotFound,
            "Academic year not found",
        )),
        None => try_or_respond!(found(
            storage.get_current_academic_year(school_id).await,
            ErrorCode::NoCurrentAcademicYear,
            "No current academic year",
        )),
    };

    let fees = try_or_respond!(stored(
        storage
            .list_fee_structures(
                school_id,
                FeeStructureListQuery {
                    class_id: Some(student.class_id),
                    academic_year_id: Some(year.id),
                },
            )
            .await,
        "Failed to load fees",
    ));
    let fee_ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
    let paid = try_or_respond!(stored(
        storage
            .sum_student_payments(school_id, student_id, &fee_ids)
            .await,
        "Failed to load payments",
    ));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_statement(student_id, year.id, fees, &paid, Utc::now().date_naive()),
        "Fee statement retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn fee(id: i64, amount: i64, due_date: Option<NaiveDate>) -> FeeStructure {
        FeeStructure {
            id,
            school_id: 1,
            class_id: 1,
            academic_year_id: 1,
            title: format!("Fee {id}"),
            amount,
            due_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_statement_totals_and_statuses() {
        let fees = vec![
            fee(1, 10_000, Some(d(4, 30))),
            fee(2, 5_000, Some(d(4, 30))),
            fee(3, 2_000, Some(d(9, 30))),
            fee(4, 1_000, None),
        ];
        let paid = HashMap::from([(1, 10_000), (2, 1_000), (3, 500)]);

        let statement = build_statement(7, 1, fees, &paid, d(6, 1));

        let statuses: Vec<_> = statement.fees.iter().map(|l| l.status).collect();
        assert_eq!(
            statuses,
            vec![
                FeeStatus::Paid,
                FeeStatus::Overdue,
                FeeStatus::Partial,
                FeeStatus::Unpaid
            ]
        );
        assert_eq!(statement.total_due, 18_000);
        assert_eq!(statement.total_paid, 11_500);
        assert_eq!(statement.total_balance, 6_500);
        assert_eq!(statement.fees[1].balance, 4_000);
    }
}
