//! 升级与排名计算
//!
//! 纯函数，输入为班级在读学生、班级科目以及按 (学生, 科目) 汇总后的得分。

use std::collections::HashMap;

use crate::config::AcademicsConfig;
use crate::models::{
    classes::entities::Subject,
    marks::entities::MarkTotal,
    promotions::{
        entities::PromotionDecision,
        responses::{StudentPromotionResult, SubjectResult},
    },
    students::entities::Student,
};
use crate::utils::{competition_ranks, percentage, round2, score_desc};

/// 按阈值给出升级结论
pub fn classify(average: Option<f64>, failed_subjects: u32, rules: &AcademicsConfig) -> PromotionDecision {
    match average {
        // 没有任何成绩
        None => PromotionDecision::Repeat,
        Some(avg)
            if avg >= rules.promote_threshold && failed_subjects <= rules.max_failed_subjects =>
        {
            PromotionDecision::Promote
        }
        Some(avg) if avg >= rules.repeat_threshold => PromotionDecision::Repeat,
        Some(_) => PromotionDecision::Drop,
    }
}

/// 计算全班的升级结果
///
/// 返回顺序：有平均分的学生按名次排列（同名次按学号），其后是没有成绩的学生（按学号）。
pub fn compute_results(
    students: &[Student],
    subjects: &[Subject],
    totals: &[MarkTotal],
    rules: &AcademicsConfig,
) -> Vec<StudentPromotionResult> {
    let totals_by_key: HashMap<(i64, i64), &MarkTotal> = totals
        .iter()
        .map(|t| ((t.student_id, t.subject_id), t))
        .collect();

    let mut results: Vec<StudentPromotionResult> = students
        .iter()
        .map(|student| {
            // 平均分取未舍入的科目百分比
            let mut pct_sum = 0.0;
            let subject_results: Vec<SubjectResult> = subjects
                .iter()
                .filter_map(|subject| {
                    let total = totals_by_key.get(&(student.id, subject.id))?;
                    let pct = percentage(total.obtained, total.maximum);
                    pct_sum += pct;
                    Some(SubjectResult {
                        subject_id: subject.id,
                        subject_name: subject.name.clone(),
                        obtained: round2(total.obtained),
                        max: round2(total.maximum),
                        percentage: round2(pct),
                        passed: pct >= subject.pass_percentage(),
                        rank: 0,
                    })
                })
                .collect();

            let average = if subject_results.is_empty() {
                None
            } else {
                Some(round2(pct_sum / subject_results.len() as f64))
            };
            let failed_subjects = subject_results.iter().filter(|s| !s.passed).count() as u32;

            StudentPromotionResult {
                student_id: student.id,
                student_name: student.full_name(),
                admission_no: student.admission_no.clone(),
                average,
                failed_subjects,
                class_rank: None,
                decision: classify(average, failed_subjects, rules),
                subjects: subject_results,
            }
        })
        .collect();

    assign_subject_ranks(&mut results, subjects);

    results.sort_by(|a, b| match (a.average, b.average) {
        (Some(x), Some(y)) => score_desc(x, y).then_with(|| a.admission_no.cmp(&b.admission_no)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.admission_no.cmp(&b.admission_no),
    });
    let averages: Vec<f64> = results.iter().filter_map(|r| r.average).collect();
    for (result, rank) in results.iter_mut().zip(competition_ranks(&averages)) {
        result.class_rank = Some(rank);
    }

    results
}

// 单科名次只在该科有成绩的学生之间比较
fn assign_subject_ranks(results: &mut [StudentPromotionResult], subjects: &[Subject]) {
    for subject in subjects {
        // (结果下标, 科目下标, 百分比, 学号)
        let mut entries: Vec<(usize, usize, f64, String)> = results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| {
                r.subjects
                    .iter()
                    .position(|s| s.subject_id == subject.id)
                    .map(|j| (i, j, r.subjects[j].percentage, r.admission_no.clone()))
            })
            .collect();
        entries.sort_by(|a, b| score_desc(a.2, b.2).then_with(|| a.3.cmp(&b.3)));

        let scores: Vec<f64> = entries.iter().map(|e| e.2).collect();
        for ((i, j, _, _), rank) in entries.into_iter().zip(competition_ranks(&scores)) {
            results[i].subjects[j].rank = rank;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::StudentStatus;
    use chrono::Utc;

    fn rules() -> AcademicsConfig {
        AcademicsConfig {
            promote_threshold: 40.0,
            repeat_threshold: 25.0,
            max_failed_subjects: 1,
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

    fn subject(id: i64, max: f64, pass: f64) -> Subject {
        Subject {
            id,
            school_id: 1,
            class_id: 1,
            name: format!("Subject {id}"),
            code: None,
            teacher_name: None,
            max_marks: max,
            pass_marks: pass,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn total(student_id: i64, subject_id: i64, obtained: f64, maximum: f64) -> MarkTotal {
        MarkTotal {
            student_id,
            subject_id,
            obtained,
            maximum,
        }
    }

    #[test]
    fn test_classify_thresholds() {
        let rules = rules();
        assert_eq!(classify(None, 0, &rules), PromotionDecision::Repeat);
        assert_eq!(classify(Some(40.0), 1, &rules), PromotionDecision::Promote);
        assert_eq!(classify(Some(90.0), 2, &rules), PromotionDecision::Repeat);
        assert_eq!(classify(Some(25.0), 0, &rules), PromotionDecision::Repeat);
        assert_eq!(classify(Some(24.99), 0, &rules), PromotionDecision::Drop);
    }

    #[test]
    fn test_average_is_mean_of_subject_percentages() {
        let students = vec![student(1, "A001")];
        let subjects = vec![subject(1, 100.0, 33.0), subject(2, 50.0, 17.0)];
        // 两场考试合计：80/200 = 40%，90/100 = 90%
        let totals = vec![total(1, 1, 80.0, 200.0), total(1, 2, 90.0, 100.0)];

        let results = compute_results(&students, &subjects, &totals, &rules());
        assert_eq!(results[0].average, Some(65.0));
        assert_eq!(results[0].failed_subjects, 0);
        assert_eq!(results[0].decision, PromotionDecision::Promote);
        assert_eq!(results[0].class_rank, Some(1));
    }

    #[test]
    fn test_average_uses_unrounded_totals() {
        let students = vec![student(1, "A001")];
        let subjects = vec![subject(1, 3.004, 1.0)];
        // 2.004 / 3.004 = 66.711%，舍入后的 2.0 / 3.0 只有 66.667%
        let totals = vec![total(1, 1, 2.004, 3.004)];

        let results = compute_results(&students, &subjects, &totals, &rules());
        assert_eq!(results[0].subjects[0].obtained, 2.0);
        assert_eq!(results[0].subjects[0].max, 3.0);
        assert_eq!(results[0].subjects[0].percentage, 66.71);
        assert_eq!(results[0].average, Some(66.71));
    }

    #[test]
    fn test_failed_subjects_block_promotion() {
        let students = vec![student(1, "A001")];
        let subjects = vec![
            subject(1, 100.0, 33.0),
            subject(2, 100.0, 33.0),
            subject(3, 100.0, 33.0),
        ];
        let totals = vec![
            total(1, 1, 100.0, 100.0),
            total(1, 2, 30.0, 100.0),
            total(1, 3, 20.0, 100.0),
        ];

        let results = compute_results(&students, &subjects, &totals, &rules());
        assert_eq!(results[0].average, Some(50.0));
        assert_eq!(results[0].failed_subjects, 2);
        assert_eq!(results[0].decision, PromotionDecision::Repeat);
    }

    #[test]
    fn test_competition_ranking_and_tie_order() {
        let students = vec![
            student(1, "A003"),
            student(2, "A001"),
            student(3, "A002"),
            student(4, "A004"),
            student(5, "A005"),
        ];
        let subjects = vec![subject(1, 100.0, 33.0)];
        let totals = vec![
            total(1, 1, 80.0, 100.0),
            total(2, 1, 90.0, 100.0),
            total(3, 1, 80.0, 100.0),
            total(4, 1, 10.0, 100.0),
        ];

        let results = compute_results(&students, &subjects, &totals, &rules());
        let order: Vec<(&str, Option<u32>)> = results
            .iter()
            .map(|r| (r.admission_no.as_str(), r.class_rank))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A001", Some(1)),
                ("A002", Some(2)),
                ("A003", Some(2)),
                ("A004", Some(4)),
                ("A005", None),
            ]
        );
        assert_eq!(results[3].decision, PromotionDecision::Drop);
        // 没有成绩的学生留级，且没有平均分
        assert_eq!(results[4].decision, PromotionDecision::Repeat);
        assert_eq!(results[4].average, None);
        assert!(results[4].subjects.is_empty());
    }

    #[test]
    fn test_subject_ranks_among_students_with_marks() {
        let students = vec![student(1, "A001"), student(2, "A002"), student(3, "A003")];
        let subjects = vec![subject(1, 100.0, 33.0), subject(2, 100.0, 33.0)];
        let totals = vec![
            total(1, 1, 50.0, 100.0),
            total(2, 1, 70.0, 100.0),
            total(3, 1, 70.0, 100.0),
            total(1, 2, 60.0, 100.0),
        ];

        let results = compute_results(&students, &subjects, &totals, &rules());
        let by_id: HashMap<i64, &StudentPromotionResult> =
            results.iter().map(|r| (r.student_id, r)).collect();
        assert_eq!(by_id[&1].subjects[0].rank, 3);
        assert_eq!(by_id[&2].subjects[0].rank, 1);
        assert_eq!(by_id[&3].subjects[0].rank, 1);
        assert_eq!(by_id[&1].subjects[1].rank, 1);
        assert_eq!(by_id[&2].subjects.len(), 1);
    }
}
