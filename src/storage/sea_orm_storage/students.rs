//! 学生存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    students::{
        entities::{Student, StudentStatus},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(
        &self,
        school_id: i64,
        req: CreateStudentRequest,
    ) -> Result<Student> {
        let now = now_ts();

        let model = ActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            house_id: Set(req.house_id),
            admission_no: Set(req.admission_no),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            gender: Set(req.gender.map(|g| g.to_string())),
            date_of_birth: Set(req.date_of_birth),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(req.guardian_phone),
            email: Set(req.email),
            roll_number: Set(req.roll_number),
            status: Set(StudentStatus::Active.to_string()),
            admitted_on: Set(req.admitted_on),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建学生失败", e))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_impl(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find().filter(Column::SchoolId.eq(school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(house_id) = query.house_id {
            select = select.filter(Column::HouseId.eq(house_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        // 搜索姓名或学号
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.contains(&escaped))
                    .add(Column::LastName.contains(&escaped))
                    .add(Column::AdmissionNo.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::AdmissionNo);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生页数失败: {e}")))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 班级中的在读学生
    pub async fn list_active_class_students_impl(
        &self,
        school_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(StudentStatus::Active.as_str()))
            .order_by_asc(Column::AdmissionNo)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(class_id) = update.class_id {
            model.class_id = Set(class_id);
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender.to_string()));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(Some(guardian_name));
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(Some(guardian_phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(roll_number) = update.roll_number {
            model.roll_number = Set(Some(roll_number));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学生失败", e))?;

        self.get_student_impl(school_id, id).await
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Students::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 设置或清除学院
    pub async fn set_student_house_impl(
        &self,
        school_id: i64,
        student_id: i64,
        house_id: Option<i64>,
    ) -> Result<Option<Student>> {
        if self.get_student_impl(school_id, student_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(student_id),
            house_id: Set(house_id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学生学院失败", e))?;

        self.get_student_impl(school_id, student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_house, seed_school, seed_student,
    };

    #[tokio::test]
    async fn test_list_students_filters_and_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "STU").await;
        let one = seed_class(&storage, school.id, "Grade 1", 1).await;
        let two = seed_class(&storage, school.id, "Grade 2", 2).await;
        seed_student(&storage, school.id, one.id, "S-002").await;
        seed_student(&storage, school.id, one.id, "S-001").await;
        seed_student(&storage, school.id, two.id, "T-001").await;

        let page = storage
            .list_students_with_pagination_impl(
                school.id,
                StudentListQuery {
                    class_id: Some(one.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.items[0].admission_no, "S-001");

        let searched = storage
            .list_students_with_pagination_impl(
                school.id,
                StudentListQuery {
                    search: Some("T-0".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);
        assert_eq!(searched.items[0].class_id, two.id);
    }

    #[tokio::test]
    async fn test_admission_no_unique_per_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = seed_school(&storage, "AAA").await;
        let b = seed_school(&storage, "BBB").await;
        let class_a = seed_class(&storage, a.id, "Grade 1", 1).await;
        let class_b = seed_class(&storage, b.id, "Grade 1", 1).await;
        seed_student(&storage, a.id, class_a.id, "X-1").await;
        // 不同学校可以重复
        seed_student(&storage, b.id, class_b.id, "X-1").await;

        let err = storage
            .create_student_impl(
                a.id,
                CreateStudentRequest {
                    class_id: class_a.id,
                    house_id: None,
                    admission_no: "X-1".to_string(),
                    first_name: "Dup".to_string(),
                    last_name: "Licate".to_string(),
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
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_and_clear_house() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "HSE").await;
        let class = seed_class(&storage, school.id, "Grade 1", 1).await;
        let house = seed_house(&storage, school.id, "Red").await;
        let student = seed_student(&storage, school.id, class.id, "H-1").await;

        let assigned = storage
            .set_student_house_impl(school.id, student.id, Some(house.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assigned.house_id, Some(house.id));

        let cleared = storage
            .set_student_house_impl(school.id, student.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.house_id, None);
    }
}
