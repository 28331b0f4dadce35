use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::models::{
    ApiResponse, ErrorCode,
    academic_years::entities::Exam,
    classes::entities::Subject,
    marks::{
        entities::Mark,
        requests::ReportCardQuery,
        responses::{ReportCard, ReportCardSubject},
    },
    students::entities::Student,
};
use crate::services::{found, not_found, require_school_id, stored, try_or_respond};
use crate::utils::{competition_ranks, letter_grade, percentage, round2, score_desc};

/// 生成单场考试的成绩单
///
/// 只统计学生所在班级的科目。名次按总分百分比在同一场考试中有成绩的同班学生里计算，
/// 学生没有任何成绩时返回 `None`。
pub fn build_report_card(
    student: &Student,
    exam: &Exam,
    subjects: &[Subject],
    marks: &[Mark],
) -> Option<ReportCard> {
    let subject_by_id: HashMap<i64, &Subject> = subjects.iter().map(|s| (s.id, s)).collect();

    // student_id -> (得分, 满分)
    let mut totals: HashMap<i64, (f64, f64)> = HashMap::new();
    for mark in marks.iter().filter(|m| subject_by_id.contains_key(&m.subject_id)) {
        let entry = totals.entry(mark.student_id).or_insert((0.0, 0.0));
        entry.0 += mark.marks_obtained;
        entry.1 += mark.max_marks;
    }
    let (total_obtained, total_max) = *totals.get(&student.id)?;

    let own: HashMap<i64, &Mark> = marks
        .iter()
        .filter(|m| m.student_id == student.id)
        .map(|m| (m.subject_id, m))
        .collect();
    let rows: Vec<ReportCardSubject> = subjects
        .iter()
        .filter_map(|subject| {
            let mark = own.get(&subject.id)?;
            let pct = percentage(mark.marks_obtained, mark.max_marks);
            Some(ReportCardSubject {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                marks_obtained: mark.marks_obtained,
                max_marks: mark.max_marks,
                percentage: round2(pct),
                grade: letter_grade(pct).to_string(),
                passed: pct >= subject.pass_percentage(),
            })
        })
        .collect();

    let mut ranked: Vec<(i64, f64)> = totals
        .iter()
        .map(|(id, (obtained, max))| (*id, percentage(*obtained, *max)))
        .collect();
    ranked.sort_by(|a, b| score_desc(a.1, b.1).then(a.0.cmp(&b.0)));
    let scores: Vec<f64> = ranked.iter().map(|(_, score)| *score).collect();
    let ranks = competition_ranks(&scores);
    let class_rank = ranked
        .iter()
        .position(|(id, _)| *id == student.id)
        .map(|i| ranks[i]);

    let overall = percentage(total_obtained, total_max);
    Some(ReportCard {
        student_id: student.id,
        student_name: student.full_name(),
        admission_no: student.admission_no.clone(),
        class_id: student.class_id,
        exam_id: exam.id,
        exam_name: exam.name.clone(),
        subjects: rows,
        total_obtained: round2(total_obtained),
        total_max: round2(total_max),
        percentage: round2(overall),
        grade: letter_grade(overall).to_string(),
        class_rank,
        class_size: ranked.len() as u32,
    })
}

pub async fn get_report_card(
    service: &MarkService,
    request: &HttpRequest,
    student_id: i64,
    query: ReportCardQuery,
) -> ActixResult<HttpResponse> {
    let school_id = try_or_respond!(require_school_id(request));
    let storage = service.get_storage(request);

    let student = try_or_respond!(found(
        storage.get_student(school_id, student_id).await,
        ErrorCode::StudentNotFound,
        "Student not found",
    ));
    let exam = try_or_respond!(found(
        storage.get_exam(school_id, query.exam_id).await,
        ErrorCode::ExamNotFound,
        "Exam not found",
    ));
    let subjects = try_or_respond!(stored(
        storage.list_subjects(school_id, student.class_id).await,
        "Failed to load subjects",
    ));

    let mut student_ids: Vec<i64> = try_or_respond!(stored(
        storage
            .list_active_class_students(school_id, student.class_id)
            .await,
        "Failed to load class students",
    ))
    .into_iter()
    .map(|s| s.id)
    .collect();
    if !student_ids.contains(&student.id) {
        student_ids.push(student.id);
    }

    let marks = try_or_respond!(stored(
        storage
            .list_exam_marks_for_students(school_id, exam.id, &student_ids)
            .await,
        "Failed to load marks",
    ));

    match build_report_card(&student, &exam, &subjects, &marks) {
        Some(card) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            card,
            "Report card generated successfully",
        ))),
        None => Ok(not_found(
            ErrorCode::MarksNotFound,
            "No marks recorded for this student in the exam",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::StudentStatus;
    use chrono::Utc;

    fn student(id: i64) -> Student {
        Student {
            id,
            school_id: 1,
            class_id: 1,
            house_id: None,
            admission_no: format!("A{id:03}"),
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

    fn exam() -> Exam {
        Exam {
            id: 9,
            school_id: 1,
            term_id: 1,
            name: "Midterm".to_string(),
            exam_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subject(id: i64, name: &str) -> Subject {
        Subject {
            id,
            school_id: 1,
            class_id: 1,
            name: name.to_string(),
            code: None,
            teacher_name: None,
            max_marks: 100.0,
            pass_marks: 33.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn mark(student_id: i64, subject_id: i64, obtained: f64) -> Mark {
        Mark {
            id: student_id * 100 + subject_id,
            school_id: 1,
            exam_id: 9,
            subject_id,
            student_id,
            marks_obtained: obtained,
            max_marks: 100.0,
            remark: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_card_totals_and_rank() {
        let subjects = vec![subject(1, "Math"), subject(2, "English")];
        let marks = vec![
            mark(1, 1, 90.0),
            mark(1, 2, 30.0),
            mark(2, 1, 80.0),
            mark(2, 2, 70.0),
            mark(3, 1, 60.0),
            mark(3, 2, 60.0),
        ];

        let card = build_report_card(&student(1), &exam(), &subjects, &marks).unwrap();
        assert_eq!(card.total_obtained, 120.0);
        assert_eq!(card.total_max, 200.0);
        assert_eq!(card.percentage, 60.0);
        assert_eq!(card.grade, "B");
        // 60% 与 3 号同分，均排第二
        assert_eq!(card.class_rank, Some(2));
        assert_eq!(card.class_size, 3);
        assert_eq!(card.subjects.len(), 2);
        assert!(card.subjects[0].passed);
        assert_eq!(card.subjects[1].grade, "F");
        assert!(!card.subjects[1].passed);

        let top = build_report_card(&student(2), &exam(), &subjects, &marks).unwrap();
        assert_eq!(top.class_rank, Some(1));
    }

    #[test]
    fn test_report_card_without_marks() {
        let subjects = vec![subject(1, "Math")];
        let marks = vec![mark(2, 1, 50.0)];
        assert!(build_report_card(&student(1), &exam(), &subjects, &marks).is_none());
    }

    #[test]
    fn test_marks_of_other_classes_subjects_ignored() {
        let subjects = vec![subject(1, "Math")];
        let marks = vec![mark(1, 1, 50.0), mark(1, 7, 100.0)];
        let card = build_report_card(&student(1), &exam(), &subjects, &marks).unwrap();
        assert_eq!(card.total_max, 100.0);
        assert_eq!(card.subjects.len(), 1);
    }
}
