//! 学院（分组）存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, now_ts};
use crate::entity::houses::{ActiveModel, Column, Entity as Houses};
use crate::entity::students::{
    ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Students,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    houses::{
        entities::House,
        requests::{CreateHouseRequest, UpdateHouseRequest},
        responses::{HouseAssignment, HouseWithCount},
    },
    students::entities::{Student, StudentStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_house_impl(&self, school_id: i64, req: CreateHouseRequest) -> Result<House> {
        let now = now_ts();
        let model = ActiveModel {
            school_id: Set(school_id),
            name: Set(req.name.trim().to_string()),
            color: Set(req.color),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建学院失败", e))?;

        Ok(result.into_house())
    }

    pub async fn get_house_impl(&self, school_id: i64, id: i64) -> Result<Option<House>> {
        let result = Houses::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学院失败: {e}")))?;

        Ok(result.map(|m| m.into_house()))
    }

    /// 学院列表及在读人数
    pub async fn list_houses_with_counts_impl(&self, school_id: i64) -> Result<Vec<HouseWithCount>> {
        let houses = Houses::find()
            .filter(Column::SchoolId.eq(school_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学院失败: {e}")))?;

        let counts: Vec<(i64, i64)> = Students::find()
            .select_only()
            .column(StudentColumn::HouseId)
            .column_as(StudentColumn::Id.count(), "member_count")
            .filter(StudentColumn::SchoolId.eq(school_id))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.as_str()))
            .filter(StudentColumn::HouseId.is_not_null())
            .group_by(StudentColumn::HouseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计学院人数失败: {e}")))?;
        let counts: HashMap<i64, i64> = counts.into_iter().collect();

        Ok(houses
            .into_iter()
            .map(|m| {
                let member_count = counts.get(&m.id).copied().unwrap_or(0);
                HouseWithCount {
                    house: m.into_house(),
                    member_count,
                }
            })
            .collect())
    }

    pub async fn update_house_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateHouseRequest,
    ) -> Result<Option<House>> {
        if self.get_house_impl(school_id, id).await?.is_none() {
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
        if let Some(color) = update.color {
            model.color = Set(Some(color));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学院失败", e))?;

        Ok(Some(result.into_house()))
    }

    pub async fn delete_house_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Houses::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学院失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_students_without_house_impl(
        &self,
        school_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>> {
        let mut select = Students::find()
            .filter(StudentColumn::SchoolId.eq(school_id))
            .filter(StudentColumn::Status.eq(StudentStatus::Active.as_str()))
            .filter(StudentColumn::HouseId.is_null());

        if let Some(class_id) = class_id {
            select = select.filter(StudentColumn::ClassId.eq(class_id));
        }

        let students = select
            .order_by_asc(StudentColumn::AdmissionNo)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn assign_houses_impl(
        &self,
        school_id: i64,
        assignments: &[HouseAssignment],
    ) -> Result<()> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        for assignment in assignments {
            Students::update_many()
                .set(StudentActiveModel {
                    house_id: Set(Some(assignment.house_id)),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(StudentColumn::Id.eq(assignment.student_id))
                .filter(StudentColumn::SchoolId.eq(school_id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::from_db("分配学院失败", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{
        seed_class, seed_house, seed_school, seed_student,
    };

    #[tokio::test]
    async fn test_counts_and_unassigned() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "HSE").await;
        let class = seed_class(&storage, school.id, "Grade 3", 3).await;
        let red = seed_house(&storage, school.id, "Red").await;
        let blue = seed_house(&storage, school.id, "Blue").await;
        let s2 = seed_student(&storage, school.id, class.id, "H-2").await;
        let s1 = seed_student(&storage, school.id, class.id, "H-1").await;
        let s3 = seed_student(&storage, school.id, class.id, "H-3").await;

        let pending = storage
            .list_students_without_house_impl(school.id, Some(class.id))
            .await
            .unwrap();
        let ids: Vec<_> = pending.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![s1.id, s2.id, s3.id]);

        storage
            .assign_houses_impl(
                school.id,
                &[
                    HouseAssignment { student_id: s1.id, house_id: red.id },
                    HouseAssignment { student_id: s2.id, house_id: red.id },
                ],
            )
            .await
            .unwrap();

        let houses = storage.list_houses_with_counts_impl(school.id).await.unwrap();
        assert_eq!(houses.len(), 2);
        assert_eq!(houses[0].house.id, red.id);
        assert_eq!(houses[0].member_count, 2);
        assert_eq!(houses[1].house.id, blue.id);
        assert_eq!(houses[1].member_count, 0);

        let pending = storage
            .list_students_without_house_impl(school.id, None)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, s3.id);
    }

    #[tokio::test]
    async fn test_duplicate_house_name_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "HS2").await;
        seed_house(&storage, school.id, "Green").await;

        let err = storage
            .create_house_impl(
                school.id,
                CreateHouseRequest {
                    name: "Green".to_string(),
                    color: None,
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }
}
