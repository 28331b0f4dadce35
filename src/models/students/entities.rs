use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    #[ts(export, export_to = "student.ts")]
    StudentStatus {
        Active => "active",
        Graduated => "graduated",
        Dropped => "dropped",
        Transferred => "transferred",
    }
}

crate::define_string_enum! {
    #[ts(export, export_to = "student.ts")]
    Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub house_id: Option<i64>,
    // 学号，在学校内唯一
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<i32>,
    pub status: StudentStatus,
    pub admitted_on: Option<NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}
