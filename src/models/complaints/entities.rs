use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "complaint.ts")]
    ComplaintCategory {
        Academic => "academic",
        Discipline => "discipline",
        Facility => "facility",
        Transport => "transport",
        Fee => "fee",
        Other => "other",
    }
}

crate::define_string_enum! {
    #[ts(export, export_to = "complaint.ts")]
    ComplaintStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Rejected => "rejected",
    }
}

impl ComplaintStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        use ComplaintStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (Open, Resolved) | (Open, Rejected) | (InProgress, Resolved) | (InProgress, Rejected)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "complaint.ts")]
pub struct Complaint {
    pub id: i64,
    pub school_id: i64,
    pub student_id: Option<i64>,
    pub complainant_name: String,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub resolution: Option<String>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(ComplaintStatus::Open.can_transition_to(ComplaintStatus::InProgress));
        assert!(ComplaintStatus::Open.can_transition_to(ComplaintStatus::Resolved));
        assert!(ComplaintStatus::InProgress.can_transition_to(ComplaintStatus::Rejected));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!ComplaintStatus::InProgress.can_transition_to(ComplaintStatus::Open));
        assert!(!ComplaintStatus::Open.can_transition_to(ComplaintStatus::Open));
        for next in ComplaintStatus::ALL {
            assert!(!ComplaintStatus::Resolved.can_transition_to(*next));
            assert!(!ComplaintStatus::Rejected.can_transition_to(*next));
        }
    }
}
