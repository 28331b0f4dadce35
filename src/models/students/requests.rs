use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Gender, StudentStatus};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub class_id: i64,
    pub house_id: Option<i64>,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<i32>,
    pub admitted_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub class_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<i32>,
    pub status: Option<StudentStatus>,
}

// 学生列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub house_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

// 设置或清除学生所属学院
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct AssignHouseRequest {
    pub house_id: Option<i64>,
}
