use std::cmp::Reverse;
use std::collections::BinaryHeap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::HouseService;
use crate::models::{
    ApiResponse, ErrorCode,
    houses::{
        requests::AutoAssignRequest,
        responses::{AutoAssignResponse, HouseAssignment, HouseWithCount},
    },
    students::{entities::Student, requests::AssignHouseRequest},
};
use crate::services::{found, not_found, require_school_id, storage_error, stored, try_or_respond};

/// 依学号顺序把学生分到当前人数最少的学院，人数相同取 id 最小的学院
pub fn balance_assignments(houses: &[HouseWithCount], students: &[Student]) -> Vec<HouseAssignment> {
    let mut heap: BinaryHeap<Reverse<(i64, i64)>> = houses
        .iter()
        .map(|h| Reverse((h.member_count, h.house.id)))
        .collect();
    if heap.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Student> = students.iter().collect();
    ordered.sort_by(|a, b| a.admission_no.cmp(&b.admission_no));

    let mut assignments = Vec::with_capacity(ordered.len());
    for student in ordered {
        if let Some(Reverse((count, house_id))) = heap.pop() {
            assignments.push(HouseAssignment {
                student_id: student.id,
                house_id,
            });
            heap.push(Reverse((count + 1, house_id)));
        }
    }
    assignments
}

pub async fn set_student_house(
    service: &HouseService,
    request: &HttpRequest,
    student_id: i64,
    req: AssignHouseRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Some(house_id) = req.house_id {
        try_or_respond!(found(
            storage.get_house(school_id, house_id).await,
            ErrorCode::HouseNotFound,
            "House not found",
        ));
    }

    match storage.set_student_house(school_id, student_id, req.house_id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student house updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error("Student house update failed", e)),
    }
}

pub async fn auto_assign(
    service: &HouseService,
    request: &HttpRequest,
    req: AutoAssignRequest,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    if let Some(class_id) = req.class_id {
        try_or_respond!(found(
            storage.get_class(school_id, class_id).await,
            ErrorCode::ClassNotFound,
            "Class not found",
        ));
    }

    let houses = try_or_respond!(stored(
        storage.list_houses_with_counts(school_id).await,
        "Failed to load houses",
    ));
    if houses.is_empty() {
        return Ok(not_found(
            ErrorCode::HouseNotFound,
            "No houses defined for this school",
        ));
    }
    let students = try_or_respond!(stored(
        storage.list_students_without_house(school_id, req.class_id).await,
        "Failed to load students without a house",
    ));

    let assigned = balance_assignments(&houses, &students);
    if !assigned.is_empty() {
        try_or_respond!(stored(
            storage.assign_houses(school_id, &assigned).await,
            "Failed to assign houses",
        ));
    }

    info!(
        "Auto-assigned {} students to {} houses in school {}",
        assigned.len(),
        houses.len(),
        school_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AutoAssignResponse { assigned },
        "Houses assigned successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{houses::entities::House, students::entities::StudentStatus};
    use chrono::Utc;

    fn house(id: i64, member_count: i64) -> HouseWithCount {
        HouseWithCount {
            house: House {
                id,
                school_id: 1,
                name: format!("House {id}"),
                color: None,
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            member_count,
        }
    }

    fn student(id: i64, admission_no: &str) -> Student {
        Student {
            id,
            school_id: 1,
            class_id: 1,
            house_id: None,
            admission_no: admission_no.to_string(),
            first_name: "Stu".to_string(),
            last_name: id.to_string(),
            gender: None,
            date_of_birth: None,
            guardian_name: None,
            guardian_phone: None,
            email: None,
            roll_number: None,
            status: StudentStatus::Active,
            admitted_on: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fewest_members_first() {
        let houses = vec![house(1, 3), house(2, 1), house(3, 2)];
        let students = vec![
            student(10, "A003"),
            student(11, "A001"),
            student(12, "A002"),
            student(13, "A004"),
        ];

        let assigned = balance_assignments(&houses, &students);
        let pairs: Vec<(i64, i64)> = assigned.iter().map(|a| (a.student_id, a.house_id)).collect();
        // A001 -> 2 (1 人)，A002 -> 2 (2 人，与 3 同数取小 id)，A003 -> 3，A004 -> 1
        assert_eq!(pairs, vec![(11, 2), (12, 2), (10, 3), (13, 1)]);
    }

    #[test]
    fn test_no_houses_assigns_nothing() {
        assert!(balance_assignments(&[], &[student(1, "A001")]).is_empty());
        assert!(balance_assignments(&[house(1, 0)], &[]).is_empty());
    }
}
