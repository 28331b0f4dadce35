use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MarkAttendanceResponse {
    pub saved: usize,
    pub records: Vec<AttendanceRecord>,
}

// 某班某日的点名表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSheet {
    pub class_id: i64,
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
    // 尚未点名的在读学生
    pub unmarked_student_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub excused: u32,
    pub total: u32,
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn from_statuses(
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        statuses: &[AttendanceStatus],
    ) -> Self {
        let mut summary = AttendanceSummary {
            student_id,
            from,
            to,
            present: 0,
            absent: 0,
            late: 0,
            excused: 0,
            total: 0,
            attendance_rate: 0.0,
        };

        for status in statuses {
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        summary.total = statuses.len() as u32;

        if summary.total > 0 {
            let attended = (summary.present + summary.late) as f64;
            summary.attendance_rate =
                crate::utils::grading::round2(attended / summary.total as f64 * 100.0);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_late_as_attended() {
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ];
        let summary = AttendanceSummary::from_statuses(7, None, None, &statuses);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.attendance_rate, 66.67);
    }

    #[test]
    fn test_summary_without_records() {
        let summary = AttendanceSummary::from_statuses(7, None, None, &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.attendance_rate, 0.0);
    }

    #[test]
    fn test_excused_counts_against_rate() {
        let statuses = [AttendanceStatus::Present, AttendanceStatus::Excused];
        let summary = AttendanceSummary::from_statuses(1, None, None, &statuses);
        assert_eq!(summary.excused, 1);
        assert_eq!(summary.attendance_rate, 50.0);
    }
}
