use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentMethod;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeeStructureRequest {
    pub class_id: i64,
    pub academic_year_id: i64,
    pub title: String,
    pub amount: i64,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeStructureListQuery {
    pub class_id: Option<i64>,
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreatePaymentRequest {
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub amount: i64,
    pub method: PaymentMethod,
    // 缺省为当天
    pub paid_on: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub fee_structure_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct StudentFeeQuery {
    pub academic_year_id: Option<i64>,
}
