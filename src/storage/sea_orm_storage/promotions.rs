//! 升级存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::promotion_records::{ActiveModel, Column, Entity as PromotionRecords};
use crate::entity::students::{
    ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Students,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    promotions::{
        entities::{PromotionDecision, PromotionPlan, PromotionRecord},
        requests::PromotionRecordQuery,
    },
    students::entities::{Student, StudentStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Query,
};

impl SeaOrmStorage {
    /// 该班级在该学年是否已执行过升级
    pub async fn promotion_applied_impl(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        let count = PromotionRecords::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .filter(Column::FromClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询升级记录失败: {e}")))?;

        Ok(count > 0)
    }

    /// 参与本次升级计算的学生
    ///
    /// 班级在读学生中排除该学年已有升级记录的人（例如刚从低年级升上来的学生）。
    pub async fn list_promotion_candidates_impl(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>> {
        let processed = Query::select()
            .column(Column::StudentId)
            .from(PromotionRecords)
            .and_where(Column::SchoolId.eq(school_id))
            .and_where(Column::AcademicYearId.eq(academic_year_id))
            .to_owned();

        let students = Students::find()
            .filter(StudentColumn::SchoolId.eq(school_id))
            .filter(StudentColumn::ClassId.eq(class_id))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.as_str()))
            .filter(StudentColumn::Id.not_in_subquery(processed))
            .order_by_asc(StudentColumn::AdmissionNo)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询升级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 写入升级记录并更新学生班级与状态
    ///
    /// 没有目标班级时，升级的学生视为毕业。
    pub async fn apply_promotion_impl(
        &self,
        school_id: i64,
        plan: PromotionPlan,
    ) -> Result<Vec<PromotionRecord>> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut records = Vec::with_capacity(plan.outcomes.len());
        for outcome in plan.outcomes {
            let to_class_id = match outcome.decision {
                PromotionDecision::Promote => plan.target_class_id,
                _ => None,
            };

            let record = ActiveModel {
                school_id: Set(school_id),
                student_id: Set(outcome.student_id),
                academic_year_id: Set(plan.academic_year_id),
                from_class_id: Set(plan.from_class_id),
                to_class_id: Set(to_class_id),
                average: Set(outcome.average),
                class_rank: Set(outcome.class_rank.map(|r| r as i32)),
                decision: Set(outcome.decision.to_string()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::from_db("写入升级记录失败", e))?;

            let mut student = StudentActiveModel {
                updated_at: Set(now),
                ..Default::default()
            };
            match (outcome.decision, to_class_id) {
                (PromotionDecision::Promote, Some(class_id)) => {
                    student.class_id = Set(class_id);
                }
                (PromotionDecision::Promote, None) => {
                    student.status = Set(StudentStatus::Graduated.to_string());
                }
                (PromotionDecision::Drop, _) => {
                    student.status = Set(StudentStatus::Dropped.to_string());
                }
                (PromotionDecision::Repeat, _) => {}
            }

            Students::update_many()
                .set(student)
                .filter(StudentColumn::Id.eq(outcome.student_id))
                .filter(StudentColumn::SchoolId.eq(school_id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::from_db("更新学生状态失败", e))?;

            records.push(record.into_record());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(records)
    }

    pub async fn list_promotion_records_impl(
        &self,
        school_id: i64,
        query: PromotionRecordQuery,
    ) -> Result<Vec<PromotionRecord>> {
        let mut select = PromotionRecords::find().filter(Column::SchoolId.eq(school_id));

        if let Some(year_id) = query.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(year_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::FromClassId.eq(class_id));
        }

        let records = select
            .order_by_asc(Column::ClassRank)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询升级记录失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::promotions::entities::PromotionOutcome;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_school, seed_student, seed_year,
    };

    fn outcome(student_id: i64, decision: PromotionDecision, rank: u32) -> PromotionOutcome {
        PromotionOutcome {
            student_id,
            decision,
            average: Some(50.0),
            class_rank: Some(rank),
        }
    }

    #[tokio::test]
    async fn test_apply_moves_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "PRM").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let grade1 = seed_class(&storage, school.id, "Grade 1", 1).await;
        let grade2 = seed_class(&storage, school.id, "Grade 2", 2).await;
        let a = seed_student(&storage, school.id, grade1.id, "P-1").await;
        let b = seed_student(&storage, school.id, grade1.id, "P-2").await;
        let c = seed_student(&storage, school.id, grade1.id, "P-3").await;

        assert!(!storage
            .promotion_applied_impl(school.id, year.id, grade1.id)
            .await
            .unwrap());

        let records = storage
            .apply_promotion_impl(
                school.id,
                PromotionPlan {
                    academic_year_id: year.id,
                    from_class_id: grade1.id,
                    target_class_id: Some(grade2.id),
                    outcomes: vec![
                        outcome(a.id, PromotionDecision::Promote, 1),
                        outcome(b.id, PromotionDecision::Repeat, 2),
                        outcome(c.id, PromotionDecision::Drop, 3),
                    ],
                },
            )
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].to_class_id, Some(grade2.id));
        assert_eq!(records[1].to_class_id, None);

        let a = storage.get_student_impl(school.id, a.id).await.unwrap().unwrap();
        let b = storage.get_student_impl(school.id, b.id).await.unwrap().unwrap();
        let c = storage.get_student_impl(school.id, c.id).await.unwrap().unwrap();
        assert_eq!(a.class_id, grade2.id);
        assert_eq!(b.class_id, grade1.id);
        assert_eq!(c.status, StudentStatus::Dropped);

        assert!(storage
            .promotion_applied_impl(school.id, year.id, grade1.id)
            .await
            .unwrap());

        let listed = storage
            .list_promotion_records_impl(
                school.id,
                PromotionRecordQuery {
                    academic_year_id: Some(year.id),
                    class_id: Some(grade1.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].student_id, a.id);
    }

    #[tokio::test]
    async fn test_promote_without_target_graduates() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "GRD").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let top = seed_class(&storage, school.id, "Grade 12", 12).await;
        let student = seed_student(&storage, school.id, top.id, "G-1").await;

        storage
            .apply_promotion_impl(
                school.id,
                PromotionPlan {
                    academic_year_id: year.id,
                    from_class_id: top.id,
                    target_class_id: None,
                    outcomes: vec![outcome(student.id, PromotionDecision::Promote, 1)],
                },
            )
            .await
            .unwrap();

        let student = storage
            .get_student_impl(school.id, student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.status, StudentStatus::Graduated);
        assert_eq!(student.class_id, top.id);
    }

    #[tokio::test]
    async fn test_candidates_skip_students_promoted_this_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "CND").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let grade1 = seed_class(&storage, school.id, "Grade 1", 1).await;
        let grade2 = seed_class(&storage, school.id, "Grade 2", 2).await;
        let lower = seed_student(&storage, school.id, grade1.id, "P-1").await;
        let upper = seed_student(&storage, school.id, grade2.id, "P-2").await;

        storage
            .apply_promotion_impl(
                school.id,
                PromotionPlan {
                    academic_year_id: year.id,
                    from_class_id: grade1.id,
                    target_class_id: Some(grade2.id),
                    outcomes: vec![outcome(lower.id, PromotionDecision::Promote, 1)],
                },
            )
            .await
            .unwrap();

        let active: Vec<String> = storage
            .list_active_class_students_impl(school.id, grade2.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.admission_no)
            .collect();
        assert_eq!(active, vec!["P-1", "P-2"]);

        let candidates = storage
            .list_promotion_candidates_impl(school.id, year.id, grade2.id)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, upper.id);

        // 升上来的学生不再进入 Grade 2 的升级计算，Grade 2 可以正常执行
        let records = storage
            .apply_promotion_impl(
                school.id,
                PromotionPlan {
                    academic_year_id: year.id,
                    from_class_id: grade2.id,
                    target_class_id: None,
                    outcomes: vec![outcome(upper.id, PromotionDecision::Repeat, 1)],
                },
            )
            .await
            .unwrap();
        assert_eq!(records.len(), 1);

        // 另一学年不受影响
        let next_year = seed_year(&storage, school.id, "2026").await;
        let candidates = storage
            .list_promotion_candidates_impl(school.id, next_year.id, grade2.id)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 2);
    }
}
