//! 停学存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::suspensions::{ActiveModel, Column, Entity as Suspensions};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    suspensions::{
        entities::{Suspension, SuspensionStatus},
        requests::{CreateSuspensionRequest, SuspensionListQuery},
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建停学记录，同一学生的生效停学区间不得重叠
    pub async fn create_suspension_impl(
        &self,
        school_id: i64,
        req: CreateSuspensionRequest,
    ) -> Result<Suspension> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let overlapping = Suspensions::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::Status.eq(SuspensionStatus::Active.as_str()))
            .filter(Column::StartDate.lte(req.end_date))
            .filter(Column::EndDate.gte(req.start_date))
            .one(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学记录失败: {e}")))?;

        if let Some(existing) = overlapping {
            return Err(SchoolHubError::conflict(format!(
                "Student already suspended from {} to {}",
                existing.start_date, existing.end_date
            )));
        }

        let now = now_ts();
        let result = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            reason: Set(req.reason.trim().to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            status: Set(SuspensionStatus::Active.to_string()),
            revoke_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::from_db("创建停学记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_suspension())
    }

    pub async fn get_suspension_impl(&self, school_id: i64, id: i64) -> Result<Option<Suspension>> {
        let result = Suspensions::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学记录失败: {e}")))?;

        Ok(result.map(|m| m.into_suspension()))
    }

    pub async fn list_suspensions_with_pagination_impl(
        &self,
        school_id: i64,
        query: SuspensionListQuery,
    ) -> Result<PaginatedResponse<Suspension>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Suspensions::find().filter(Column::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(day) = query.active_on {
            select = select
                .filter(Column::Status.eq(SuspensionStatus::Active.as_str()))
                .filter(Column::StartDate.lte(day))
                .filter(Column::EndDate.gte(day));
        }

        select = select
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学页数失败: {e}")))?;
        let suspensions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: suspensions.into_iter().map(|m| m.into_suspension()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 撤销停学，仅生效中的记录可撤销
    ///
    /// 状态条件写在 UPDATE 的过滤中，并发撤销只有一个能生效。
    pub async fn revoke_suspension_impl(
        &self,
        school_id: i64,
        id: i64,
        reason: String,
    ) -> Result<Option<Suspension>> {
        let result = Suspensions::update_many()
            .set(ActiveModel {
                status: Set(SuspensionStatus::Revoked.to_string()),
                revoke_reason: Set(Some(reason.trim().to_string())),
                updated_at: Set(now_ts()),
                ..Default::default()
            })
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(SuspensionStatus::Active.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("撤销停学失败", e))?;

        if result.rows_affected == 0 {
            return match self.get_suspension_impl(school_id, id).await? {
                None => Ok(None),
                Some(existing) => Err(SchoolHubError::invalid_state(format!(
                    "Suspension {id} is already {}",
                    existing.status
                ))),
            };
        }

        self.get_suspension_impl(school_id, id).await
    }

    pub async fn find_active_suspension_impl(
        &self,
        school_id: i64,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Suspension>> {
        let result = Suspensions::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(SuspensionStatus::Active.as_str()))
            .filter(Column::StartDate.lte(date))
            .filter(Column::EndDate.gte(date))
            .order_by_desc(Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询停学记录失败: {e}")))?;

        Ok(result.map(|m| m.into_suspension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{d, seed_class, seed_school, seed_student};

    fn request(student_id: i64, start: u32, end: u32) -> CreateSuspensionRequest {
        CreateSuspensionRequest {
            student_id,
            reason: "Misconduct".to_string(),
            start_date: d(2025, 6, start),
            end_date: d(2025, 6, end),
        }
    }

    #[tokio::test]
    async fn test_overlap_rejected_until_revoked() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "SUS").await;
        let class = seed_class(&storage, school.id, "Grade 5", 5).await;
        let student = seed_student(&storage, school.id, class.id, "S-1").await;

        let first = storage
            .create_suspension_impl(school.id, request(student.id, 10, 14))
            .await
            .unwrap();

        let err = storage
            .create_suspension_impl(school.id, request(student.id, 14, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));

        let active = storage
            .find_active_suspension_impl(school.id, student.id, d(2025, 6, 12))
            .await
            .unwrap();
        assert_eq!(active.map(|s| s.id), Some(first.id));

        let revoked = storage
            .revoke_suspension_impl(school.id, first.id, "Appeal accepted".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(revoked.status, SuspensionStatus::Revoked);

        let err = storage
            .revoke_suspension_impl(school.id, first.id, "again".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::InvalidState(_)));

        storage
            .create_suspension_impl(school.id, request(student.id, 14, 20))
            .await
            .unwrap();
        assert!(storage
            .find_active_suspension_impl(school.id, student.id, d(2025, 6, 12))
            .await
            .unwrap()
            .is_none());

        let listed = storage
            .list_suspensions_with_pagination_impl(
                school.id,
                SuspensionListQuery {
                    active_on: Some(d(2025, 6, 15)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_second_revoke_keeps_first_reason() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "SU2").await;
        let class = seed_class(&storage, school.id, "Grade 6", 6).await;
        let student = seed_student(&storage, school.id, class.id, "S-2").await;
        let suspension = storage
            .create_suspension_impl(school.id, request(student.id, 3, 5))
            .await
            .unwrap();

        storage
            .revoke_suspension_impl(school.id, suspension.id, " Appeal accepted ".to_string())
            .await
            .unwrap()
            .unwrap();
        let err = storage
            .revoke_suspension_impl(school.id, suspension.id, "Parent request".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::InvalidState(_)));

        let current = storage
            .get_suspension_impl(school.id, suspension.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, SuspensionStatus::Revoked);
        assert_eq!(current.revoke_reason.as_deref(), Some("Appeal accepted"));

        assert!(storage
            .revoke_suspension_impl(school.id, 9999, "missing".to_string())
            .await
            .unwrap()
            .is_none());
    }
}
