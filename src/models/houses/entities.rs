use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学院（分组）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "house.ts")]
pub struct House {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
