//! 成绩存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::marks::{ActiveModel, Column, Entity as Marks};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    classes::entities::Subject,
    marks::{
        entities::{Mark, MarkTotal},
        requests::{MarkEntry, MarkListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 录入某场考试某科成绩，满分取自科目设置
    pub async fn upsert_marks_impl(
        &self,
        school_id: i64,
        exam_id: i64,
        subject: &Subject,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let existing = Marks::find()
                .filter(Column::SchoolId.eq(school_id))
                .filter(Column::ExamId.eq(exam_id))
                .filter(Column::SubjectId.eq(subject.id))
                .filter(Column::StudentId.eq(entry.student_id))
                .one(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

            let model = match existing {
                Some(row) => {
                    let mut active: ActiveModel = row.into();
                    active.marks_obtained = Set(entry.marks_obtained);
                    active.max_marks = Set(subject.max_marks);
                    active.remark = Set(entry.remark);
                    active.updated_at = Set(now);
                    active.update(&txn).await
                }
                None => {
                    ActiveModel {
                        school_id: Set(school_id),
                        exam_id: Set(exam_id),
                        subject_id: Set(subject.id),
                        student_id: Set(entry.student_id),
                        marks_obtained: Set(entry.marks_obtained),
                        max_marks: Set(subject.max_marks),
                        remark: Set(entry.remark),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| SchoolHubError::from_db("保存成绩失败", e))?;

            saved.push(model.into_mark());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    pub async fn list_marks_impl(
        &self,
        school_id: i64,
        exam_id: i64,
        query: MarkListQuery,
    ) -> Result<Vec<Mark>> {
        let mut select = Marks::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ExamId.eq(exam_id));

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let marks = select
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(marks.into_iter().map(|m| m.into_mark()).collect())
    }

    pub async fn list_exam_marks_for_students_impl(
        &self,
        school_id: i64,
        exam_id: i64,
        student_ids: &[i64],
    ) -> Result<Vec<Mark>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let marks = Marks::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::StudentId.is_in(student_ids.iter().copied()))
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(marks.into_iter().map(|m| m.into_mark()).collect())
    }

    pub async fn aggregate_marks_impl(
        &self,
        school_id: i64,
        exam_ids: &[i64],
        student_ids: &[i64],
        subject_ids: &[i64],
    ) -> Result<Vec<MarkTotal>> {
        if exam_ids.is_empty() || student_ids.is_empty() || subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(i64, i64, f64, f64)> = Marks::find()
            .select_only()
            .column(Column::StudentId)
            .column(Column::SubjectId)
            .column_as(Column::MarksObtained.sum(), "obtained")
            .column_as(Column::MaxMarks.sum(), "maximum")
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ExamId.is_in(exam_ids.iter().copied()))
            .filter(Column::StudentId.is_in(student_ids.iter().copied()))
            .filter(Column::SubjectId.is_in(subject_ids.iter().copied()))
            .group_by(Column::StudentId)
            .group_by(Column::SubjectId)
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::SubjectId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("汇总成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(student_id, subject_id, obtained, maximum)| MarkTotal {
                student_id,
                subject_id,
                obtained,
                maximum,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_exam, seed_school, seed_student, seed_subject, seed_term, seed_year,
    };

    fn entry(student_id: i64, marks: f64) -> MarkEntry {
        MarkEntry {
            student_id,
            marks_obtained: marks,
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_aggregate_across_exams() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "MRK").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let term = seed_term(&storage, school.id, year.id, "Term 1").await;
        let mid = seed_exam(&storage, school.id, term.id, "Mid").await;
        let fin = seed_exam(&storage, school.id, term.id, "Final").await;
        let class = seed_class(&storage, school.id, "Grade 2", 2).await;
        let maths = seed_subject(&storage, school.id, class.id, "Maths").await;
        let student = seed_student(&storage, school.id, class.id, "M-1").await;

        storage
            .upsert_marks_impl(school.id, mid.id, &maths, vec![entry(student.id, 50.0)])
            .await
            .unwrap();
        // 重复录入覆盖原成绩
        let saved = storage
            .upsert_marks_impl(school.id, mid.id, &maths, vec![entry(student.id, 60.0)])
            .await
            .unwrap();
        assert_eq!(saved[0].max_marks, 100.0);
        storage
            .upsert_marks_impl(school.id, fin.id, &maths, vec![entry(student.id, 80.0)])
            .await
            .unwrap();

        let listed = storage
            .list_marks_impl(school.id, mid.id, MarkListQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].marks_obtained, 60.0);

        let totals = storage
            .aggregate_marks_impl(school.id, &[mid.id, fin.id], &[student.id], &[maths.id])
            .await
            .unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].obtained, 140.0);
        assert_eq!(totals[0].maximum, 200.0);

        let empty = storage
            .aggregate_marks_impl(school.id, &[], &[student.id], &[maths.id])
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
