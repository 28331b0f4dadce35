//! 班级、科目存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::subjects::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subjects,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::classes::{
    entities::{Class, DEFAULT_MAX_MARKS, DEFAULT_PASS_MARKS, Subject},
    requests::{
        ClassListQuery, CreateClassRequest, CreateSubjectRequest, UpdateClassRequest,
        UpdateSubjectRequest,
    },
};
use crate::models::students::entities::StudentStatus;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, school_id: i64, req: CreateClassRequest) -> Result<Class> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name.trim().to_string()),
            section: Set(req.section),
            grade_level: Set(req.grade_level),
            class_teacher: Set(req.class_teacher),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建班级失败", e))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_impl(&self, school_id: i64, id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出班级，按年级、名称排序
    pub async fn list_classes_impl(
        &self,
        school_id: i64,
        query: ClassListQuery,
    ) -> Result<Vec<Class>> {
        let mut select = Classes::find().filter(Column::SchoolId.eq(school_id));

        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        let classes = select
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Section)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级
    pub async fn update_class_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(section) = update.section {
            model.section = Set(Some(section));
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }
        if let Some(class_teacher) = update.class_teacher {
            model.class_teacher = Set(Some(class_teacher));
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新班级失败", e))?;

        self.get_class_impl(school_id, id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Classes::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("删除班级失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级在读学生数
    pub async fn count_active_students_impl(&self, school_id: i64, class_id: i64) -> Result<i64> {
        let count = Students::find()
            .filter(StudentColumn::SchoolId.eq(school_id))
            .filter(StudentColumn::ClassId.eq(class_id))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计班级人数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 下一个年级中 ID 最小的班级
    pub async fn find_next_grade_class_impl(
        &self,
        school_id: i64,
        grade_level: i32,
    ) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::GradeLevel.gt(grade_level))
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询下一年级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    // ---------------- 科目 ----------------

    pub async fn create_subject_impl(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        let now = now_ts();

        let model = SubjectActiveModel {
            school_id: Set(school_id),
            class_id: Set(class_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            teacher_name: Set(req.teacher_name),
            max_marks: Set(req.max_marks.unwrap_or(DEFAULT_MAX_MARKS)),
            pass_marks: Set(req.pass_marks.unwrap_or(DEFAULT_PASS_MARKS)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建科目失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_impl(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .filter(SubjectColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self, school_id: i64, class_id: i64) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .filter(SubjectColumn::SchoolId.eq(school_id))
            .filter(SubjectColumn::ClassId.eq(class_id))
            .order_by_asc(SubjectColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn update_subject_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SubjectActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(Some(code));
        }
        if let Some(teacher_name) = update.teacher_name {
            model.teacher_name = Set(Some(teacher_name));
        }
        if let Some(max_marks) = update.max_marks {
            model.max_marks = Set(max_marks);
        }
        if let Some(pass_marks) = update.pass_marks {
            model.pass_marks = Set(pass_marks);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新科目失败", e))?;

        self.get_subject_impl(school_id, id).await
    }

    pub async fn delete_subject_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Subjects::delete_many()
            .filter(SubjectColumn::Id.eq(id))
            .filter(SubjectColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_school, seed_student, seed_subject,
    };

    #[tokio::test]
    async fn test_next_grade_class_picks_lowest_id() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "NXT").await;
        let five = seed_class(&storage, school.id, "Grade 5", 5).await;
        let six_a = seed_class(&storage, school.id, "Grade 6A", 6).await;
        seed_class(&storage, school.id, "Grade 6B", 6).await;
        seed_class(&storage, school.id, "Grade 8", 8).await;

        let next = storage
            .find_next_grade_class_impl(school.id, five.grade_level)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, six_a.id);

        let none = storage
            .find_next_grade_class_impl(school.id, 8)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_subject_defaults_and_unique_name() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "SUB").await;
        let class = seed_class(&storage, school.id, "Grade 1", 1).await;

        let subject = storage
            .create_subject_impl(
                school.id,
                class.id,
                CreateSubjectRequest {
                    name: "Science".to_string(),
                    code: None,
                    teacher_name: None,
                    max_marks: None,
                    pass_marks: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(subject.max_marks, DEFAULT_MAX_MARKS);
        assert_eq!(subject.pass_marks, DEFAULT_PASS_MARKS);

        seed_subject(&storage, school.id, class.id, "Maths").await;
        let err = storage
            .create_subject_impl(
                school.id,
                class.id,
                CreateSubjectRequest {
                    name: "Maths".to_string(),
                    code: None,
                    teacher_name: None,
                    max_marks: None,
                    pass_marks: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_count_active_students() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "CNT").await;
        let class = seed_class(&storage, school.id, "Grade 2", 2).await;
        seed_student(&storage, school.id, class.id, "A-1").await;
        seed_student(&storage, school.id, class.id, "A-2").await;

        let count = storage
            .count_active_students_impl(school.id, class.id)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
