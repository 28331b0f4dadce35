use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "notice.ts")]
    NoticeAudience {
        All => "all",
        Students => "students",
        Staff => "staff",
        Parents => "parents",
        Class => "class",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notice.ts")]
pub struct Notice {
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    pub body: String,
    pub audience: NoticeAudience,
    pub class_id: Option<i64>,
    pub publish_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub is_pinned: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Notice {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.publish_on <= date && self.expires_on.is_none_or(|expires| expires >= date)
    }
}
