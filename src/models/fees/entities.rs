use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "fee.ts")]
    PaymentMethod {
        Cash => "cash",
        Card => "card",
        BankTransfer => "bank_transfer",
        Online => "online",
        Cheque => "cheque",
    }
}

crate::define_string_enum! {
    #[ts(export, export_to = "fee.ts")]
    FeeStatus {
        Paid => "paid",
        Partial => "partial",
        Unpaid => "unpaid",
        Overdue => "overdue",
    }
}

impl FeeStatus {
    /// 根据应缴、已缴金额与截止日期计算缴费状态
    pub fn evaluate(amount: i64, paid: i64, due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let balance = amount - paid;
        if balance <= 0 {
            return FeeStatus::Paid;
        }
        if due_date.is_some_and(|due| due < today) {
            return FeeStatus::Overdue;
        }
        if paid > 0 {
            FeeStatus::Partial
        } else {
            FeeStatus::Unpaid
        }
    }
}

// 收费项目，金额以最小货币单位保存
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeStructure {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub academic_year_id: i64,
    pub title: String,
    pub amount: i64,
    pub due_date: Option<NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct Payment {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub amount: i64,
    pub method: PaymentMethod,
    pub receipt_no: String,
    pub paid_on: NaiveDate,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_fee_status_evaluate() {
        assert_eq!(FeeStatus::evaluate(1000, 1000, None, day(10)), FeeStatus::Paid);
        assert_eq!(FeeStatus::evaluate(1000, 400, None, day(10)), FeeStatus::Partial);
        assert_eq!(FeeStatus::evaluate(1000, 0, Some(day(20)), day(10)), FeeStatus::Unpaid);
        assert_eq!(FeeStatus::evaluate(1000, 400, Some(day(5)), day(10)), FeeStatus::Overdue);
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        assert_eq!(FeeStatus::evaluate(500, 0, Some(day(10)), day(10)), FeeStatus::Unpaid);
    }

    #[test]
    fn test_paid_fee_never_overdue() {
        assert_eq!(FeeStatus::evaluate(500, 500, Some(day(1)), day(10)), FeeStatus::Paid);
    }
}
