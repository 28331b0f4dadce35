//! 学年、学期、考试存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::academic_years::{
    ActiveModel as YearActiveModel, Column as YearColumn, Entity as AcademicYears,
};
use crate::entity::exams::{ActiveModel as ExamActiveModel, Column as ExamColumn, Entity as Exams};
use crate::entity::terms::{ActiveModel as TermActiveModel, Column as TermColumn, Entity as Terms};
use crate::errors::{Result, SchoolHubError};
use crate::models::academic_years::{
    entities::{AcademicYear, Exam, Term},
    requests::{
        CreateAcademicYearRequest, CreateExamRequest, CreateTermRequest,
        UpdateAcademicYearRequest, UpdateExamRequest, UpdateTermRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    // ---------------- 学年 ----------------

    pub async fn create_academic_year_impl(
        &self,
        school_id: i64,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let now = now_ts();
        let model = YearActiveModel {
            school_id: Set(school_id),
            name: Set(req.name.trim().to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建学年失败", e))?;

        Ok(result.into_academic_year())
    }

    pub async fn get_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find_by_id(id)
            .filter(YearColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    pub async fn list_academic_years_impl(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        let years = AcademicYears::find()
            .filter(YearColumn::SchoolId.eq(school_id))
            .order_by_desc(YearColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years.into_iter().map(|m| m.into_academic_year()).collect())
    }

    pub async fn update_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        if self.get_academic_year_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = YearActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学年失败", e))?;

        self.get_academic_year_impl(school_id, id).await
    }

    pub async fn delete_academic_year_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = AcademicYears::delete_many()
            .filter(YearColumn::Id.eq(id))
            .filter(YearColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学年失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 在同一事务内清除旧的当前学年并设置新的
    pub async fn activate_academic_year_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        if self.get_academic_year_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(false))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::SchoolId.eq(school_id))
            .filter(YearColumn::IsCurrent.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("清除当前学年失败: {e}")))?;

        AcademicYears::update_many()
            .col_expr(YearColumn::IsCurrent, Expr::value(true))
            .col_expr(YearColumn::UpdatedAt, Expr::value(now))
            .filter(YearColumn::Id.eq(id))
            .filter(YearColumn::SchoolId.eq(school_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("设置当前学年失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_academic_year_impl(school_id, id).await
    }

    pub async fn get_current_academic_year_impl(
        &self,
        school_id: i64,
    ) -> Result<Option<AcademicYear>> {
        let result = AcademicYears::find()
            .filter(YearColumn::SchoolId.eq(school_id))
            .filter(YearColumn::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询当前学年失败: {e}")))?;

        Ok(result.map(|m| m.into_academic_year()))
    }

    // ---------------- 学期 ----------------

    pub async fn create_term_impl(
        &self,
        school_id: i64,
        year_id: i64,
        req: CreateTermRequest,
    ) -> Result<Term> {
        let now = now_ts();
        let model = TermActiveModel {
            school_id: Set(school_id),
            academic_year_id: Set(year_id),
            name: Set(req.name.trim().to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建学期失败", e))?;

        Ok(result.into_term())
    }

    pub async fn get_term_impl(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        let result = Terms::find_by_id(id)
            .filter(TermColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(result.map(|m| m.into_term()))
    }

    pub async fn list_terms_impl(&self, school_id: i64, year_id: i64) -> Result<Vec<Term>> {
        let terms = Terms::find()
            .filter(TermColumn::SchoolId.eq(school_id))
            .filter(TermColumn::AcademicYearId.eq(year_id))
            .order_by_asc(TermColumn::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期列表失败: {e}")))?;

        Ok(terms.into_iter().map(|m| m.into_term()).collect())
    }

    pub async fn update_term_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>> {
        if self.get_term_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = TermActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(start_date) = update.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = update.end_date {
            model.end_date = Set(end_date);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学期失败", e))?;

        self.get_term_impl(school_id, id).await
    }

    pub async fn delete_term_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Terms::delete_many()
            .filter(TermColumn::Id.eq(id))
            .filter(TermColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学期失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    // ---------------- 考试 ----------------

    pub async fn create_exam_impl(
        &self,
        school_id: i64,
        term_id: i64,
        req: CreateExamRequest,
    ) -> Result<Exam> {
        let now = now_ts();
        let model = ExamActiveModel {
            school_id: Set(school_id),
            term_id: Set(term_id),
            name: Set(req.name.trim().to_string()),
            exam_date: Set(req.exam_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建考试失败", e))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_impl(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .filter(ExamColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    pub async fn list_exams_impl(&self, school_id: i64, term_id: i64) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .filter(ExamColumn::SchoolId.eq(school_id))
            .filter(ExamColumn::TermId.eq(term_id))
            .order_by_asc(ExamColumn::ExamDate)
            .order_by_asc(ExamColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn update_exam_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        if self.get_exam_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ExamActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(exam_date) = update.exam_date {
            model.exam_date = Set(Some(exam_date));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新考试失败", e))?;

        self.get_exam_impl(school_id, id).await
    }

    pub async fn delete_exam_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Exams::delete_many()
            .filter(ExamColumn::Id.eq(id))
            .filter(ExamColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除考试失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学年下全部考试的 ID
    pub async fn list_exam_ids_for_year_impl(
        &self,
        school_id: i64,
        year_id: i64,
    ) -> Result<Vec<i64>> {
        let term_ids: Vec<i64> = Terms::find()
            .select_only()
            .column(TermColumn::Id)
            .filter(TermColumn::SchoolId.eq(school_id))
            .filter(TermColumn::AcademicYearId.eq(year_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期失败: {e}")))?;

        if term_ids.is_empty() {
            return Ok(Vec::new());
        }

        let exam_ids: Vec<i64> = Exams::find()
            .select_only()
            .column(ExamColumn::Id)
            .filter(ExamColumn::TermId.is_in(term_ids))
            .order_by_asc(ExamColumn::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(exam_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{seed_exam, seed_school, seed_term, seed_year};

    #[tokio::test]
    async fn test_activate_keeps_single_current_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "ACT").await;
        let first = seed_year(&storage, school.id, "2025").await;
        let second = seed_year(&storage, school.id, "2026").await;

        storage
            .activate_academic_year_impl(school.id, first.id)
            .await
            .unwrap();
        let activated = storage
            .activate_academic_year_impl(school.id, second.id)
            .await
            .unwrap()
            .unwrap();
        assert!(activated.is_current);

        let years = storage.list_academic_years_impl(school.id).await.unwrap();
        assert_eq!(years.iter().filter(|y| y.is_current).count(), 1);
        let current = storage
            .get_current_academic_year_impl(school.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, second.id);
    }

    #[tokio::test]
    async fn test_years_are_scoped_by_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = seed_school(&storage, "AAA").await;
        let b = seed_school(&storage, "BBB").await;
        let year = seed_year(&storage, a.id, "2025").await;

        assert!(storage.get_academic_year_impl(b.id, year.id).await.unwrap().is_none());
        assert!(!storage.delete_academic_year_impl(b.id, year.id).await.unwrap());
        assert!(storage.activate_academic_year_impl(b.id, year.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exam_ids_for_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "EXM").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let term = seed_term(&storage, school.id, year.id, "Term 1").await;
        let exam = seed_exam(&storage, school.id, term.id, "Midterm").await;

        let ids = storage
            .list_exam_ids_for_year_impl(school.id, year.id)
            .await
            .unwrap();
        assert_eq!(ids, vec![exam.id]);

        let duplicate = storage
            .create_exam_impl(
                school.id,
                term.id,
                CreateExamRequest {
                    name: "Midterm".to_string(),
                    exam_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(duplicate, SchoolHubError::Conflict(_)));
    }
}
