//! 存储层测试夹具

use chrono::NaiveDate;

use super::SeaOrmStorage;
use crate::models::{
    academic_years::{
        entities::{AcademicYear, Exam, Term},
        requests::{CreateAcademicYearRequest, CreateExamRequest, CreateTermRequest},
    },
    classes::{
        entities::{Class, Subject},
        requests::{CreateClassRequest, CreateSubjectRequest},
    },
    houses::{entities::House, requests::CreateHouseRequest},
    schools::{entities::School, requests::CreateSchoolRequest},
    students::{entities::Student, requests::CreateStudentRequest},
};

pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub(crate) async fn seed_school(storage: &SeaOrmStorage, code: &str) -> School {
    storage
        .create_school_impl(CreateSchoolRequest {
            name: format!("School {code}"),
            code: code.to_string(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_year(storage: &SeaOrmStorage, school_id: i64, name: &str) -> AcademicYear {
    storage
        .create_academic_year_impl(
            school_id,
            CreateAcademicYearRequest {
                name: name.to_string(),
                start_date: d(2025, 4, 1),
                end_date: d(2026, 3, 31),
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_term(storage: &SeaOrmStorage, school_id: i64, year_id: i64, name: &str) -> Term {
    storage
        .create_term_impl(
            school_id,
            year_id,
            CreateTermRequest {
                name: name.to_string(),
                start_date: d(2025, 4, 1),
                end_date: d(2025, 9, 30),
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_exam(storage: &SeaOrmStorage, school_id: i64, term_id: i64, name: &str) -> Exam {
    storage
        .create_exam_impl(
            school_id,
            term_id,
            CreateExamRequest {
                name: name.to_string(),
                exam_date: None,
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_class(
    storage: &SeaOrmStorage,
    school_id: i64,
    name: &str,
    grade_level: i32,
) -> Class {
    storage
        .create_class_impl(
            school_id,
            CreateClassRequest {
                name: name.to_string(),
                section: None,
                grade_level,
                class_teacher: None,
                capacity: None,
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_subject(
    storage: &SeaOrmStorage,
    school_id: i64,
    class_id: i64,
    name: &str,
) -> Subject {
    storage
        .create_subject_impl(
            school_id,
            class_id,
            CreateSubjectRequest {
                name: name.to_string(),
                code: None,
                teacher_name: None,
                max_marks: Some(100.0),
                pass_marks: Some(40.0),
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_house(storage: &SeaOrmStorage, school_id: i64, name: &str) -> House {
    storage
        .create_house_impl(
            school_id,
            CreateHouseRequest {
                name: name.to_string(),
                color: None,
                description: None,
            },
        )
        .await
        .unwrap()
}

pub(crate) async fn seed_student(
    storage: &SeaOrmStorage,
    school_id: i64,
    class_id: i64,
    admission_no: &str,
) -> Student {
    storage
        .create_student_impl(
            school_id,
            CreateStudentRequest {
                class_id,
                house_id: None,
                admission_no: admission_no.to_string(),
                first_name: "Student".to_string(),
                last_name: admission_no.to_string(),
                gender: None,
                date_of_birth: None,
                guardian_name: None,
                guardian_phone: None,
                email: None,
                roll_number: None,
                admitted_on: None,
            },
        )
        .await
        .unwrap()
}
