use serde::Serialize;
use ts_rs::TS;

use super::entities::{FeeStatus, FeeStructure};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct StudentFeeLine {
    pub fee: FeeStructure,
    pub paid: i64,
    pub balance: i64,
    pub status: FeeStatus,
}

// 学生某学年的缴费明细
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct StudentFeeStatement {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub fees: Vec<StudentFeeLine>,
    pub total_due: i64,
    pub total_paid: i64,
    pub total_balance: i64,
}
