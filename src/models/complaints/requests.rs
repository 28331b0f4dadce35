use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ComplaintCategory, ComplaintStatus};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "complaint.ts")]
pub struct CreateComplaintRequest {
    pub student_id: Option<i64>,
    pub complainant_name: String,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "complaint.ts")]
pub struct UpdateComplaintStatusRequest {
    pub status: ComplaintStatus,
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "complaint.ts")]
pub struct ComplaintListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
    pub student_id: Option<i64>,
}
