use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "suspension.ts")]
    SuspensionStatus {
        Active => "active",
        Revoked => "revoked",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "suspension.ts")]
pub struct Suspension {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SuspensionStatus,
    pub revoke_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Suspension {
    /// 该日期是否处于生效的停学期内
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.status == SuspensionStatus::Active && self.start_date <= date && date <= self.end_date
    }

    /// 与给定区间是否重叠（含端点）
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn suspension(start: u32, end: u32, status: SuspensionStatus) -> Suspension {
        Suspension {
            id: 1,
            school_id: 1,
            student_id: 1,
            reason: "fight".to_string(),
            start_date: day(start),
            end_date: day(end),
            status,
            revoke_reason: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_covers_inclusive_range() {
        let s = suspension(10, 12, SuspensionStatus::Active);
        assert!(s.covers(day(10)));
        assert!(s.covers(day(12)));
        assert!(!s.covers(day(13)));
    }

    #[test]
    fn test_revoked_never_covers() {
        let s = suspension(10, 12, SuspensionStatus::Revoked);
        assert!(!s.covers(day(11)));
    }

    #[test]
    fn test_overlaps() {
        let s = suspension(10, 12, SuspensionStatus::Active);
        assert!(s.overlaps(day(12), day(15)));
        assert!(s.overlaps(day(1), day(10)));
        assert!(!s.overlaps(day(13), day(15)));
    }
}
