use serde::Serialize;
use ts_rs::TS;

use super::entities::House;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "house.ts")]
pub struct HouseWithCount {
    #[serde(flatten)]
    #[ts(flatten)]
    pub house: House,
    pub member_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "house.ts")]
pub struct HouseAssignment {
    pub student_id: i64,
    pub house_id: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "house.ts")]
pub struct AutoAssignResponse {
    pub assigned: Vec<HouseAssignment>,
}
