//! 投诉存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::complaints::{ActiveModel, Column, Entity as Complaints};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    complaints::{
        entities::{Complaint, ComplaintStatus},
        requests::{ComplaintListQuery, CreateComplaintRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_complaint_impl(
        &self,
        school_id: i64,
        req: CreateComplaintRequest,
    ) -> Result<Complaint> {
        let now = now_ts();
        let model = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            complainant_name: Set(req.complainant_name.trim().to_string()),
            category: Set(req.category.to_string()),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            status: Set(ComplaintStatus::Open.to_string()),
            resolution: Set(None),
            resolved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建投诉失败", e))?;

        Ok(result.into_complaint())
    }

    pub async fn get_complaint_impl(&self, school_id: i64, id: i64) -> Result<Option<Complaint>> {
        let result = Complaints::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询投诉失败: {e}")))?;

        Ok(result.map(|m| m.into_complaint()))
    }

    pub async fn list_complaints_with_pagination_impl(
        &self,
        school_id: i64,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Complaints::find().filter(Column::SchoolId.eq(school_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询投诉总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询投诉页数失败: {e}")))?;
        let complaints = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询投诉列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: complaints.into_iter().map(|m| m.into_complaint()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新处理状态，进入终态时记录处理时间
    ///
    /// 仅当当前状态仍为 `expected` 时写入，否则返回 InvalidState。
    pub async fn update_complaint_status_impl(
        &self,
        school_id: i64,
        id: i64,
        expected: ComplaintStatus,
        status: ComplaintStatus,
        resolution: Option<String>,
    ) -> Result<Option<Complaint>> {
        let now = now_ts();
        let mut model = ActiveModel {
            status: Set(status.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        if resolution.is_some() {
            model.resolution = Set(resolution);
        }
        if status.is_terminal() {
            model.resolved_at = Set(Some(now));
        }

        let result = Complaints::update_many()
            .set(model)
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新投诉状态失败", e))?;

        if result.rows_affected == 0 {
            return match self.get_complaint_impl(school_id, id).await? {
                None => Ok(None),
                Some(current) => Err(SchoolHubError::invalid_state(format!(
                    "Complaint {id} is {} (expected {expected})",
                    current.status
                ))),
            };
        }

        self.get_complaint_impl(school_id, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::complaints::entities::ComplaintCategory;
    use crate::storage::sea_orm_storage::test_support::seed_school;

    fn complaint(title: &str, category: ComplaintCategory) -> CreateComplaintRequest {
        CreateComplaintRequest {
            student_id: None,
            complainant_name: "Parent".to_string(),
            category,
            title: title.to_string(),
            description: "details".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolution_stamps_time() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "CMP").await;
        let created = storage
            .create_complaint_impl(school.id, complaint("Bus late", ComplaintCategory::Transport))
            .await
            .unwrap();
        assert_eq!(created.status, ComplaintStatus::Open);
        assert!(created.resolved_at.is_none());

        let progressing = storage
            .update_complaint_status_impl(
                school.id,
                created.id,
                ComplaintStatus::Open,
                ComplaintStatus::InProgress,
                None,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(progressing.resolved_at.is_none());

        let resolved = storage
            .update_complaint_status_impl(
                school.id,
                created.id,
                ComplaintStatus::InProgress,
                ComplaintStatus::Resolved,
                Some("Route changed".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(resolved.resolved_at.is_some());
        assert_eq!(resolved.resolution.as_deref(), Some("Route changed"));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "CM2").await;
        let first = storage
            .create_complaint_impl(school.id, complaint("A", ComplaintCategory::Academic))
            .await
            .unwrap();
        storage
            .create_complaint_impl(school.id, complaint("B", ComplaintCategory::Facility))
            .await
            .unwrap();
        storage
            .update_complaint_status_impl(
                school.id,
                first.id,
                ComplaintStatus::Open,
                ComplaintStatus::Rejected,
                Some("Duplicate".to_string()),
            )
            .await
            .unwrap();

        let open = storage
            .list_complaints_with_pagination_impl(
                school.id,
                ComplaintListQuery {
                    status: Some(ComplaintStatus::Open),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(open.pagination.total, 1);
        assert_eq!(open.items[0].title, "B");

        assert!(storage
            .update_complaint_status_impl(
                school.id,
                9999,
                ComplaintStatus::Open,
                ComplaintStatus::Resolved,
                None,
            )
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_stale_status_is_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "CM3").await;
        let created = storage
            .create_complaint_impl(school.id, complaint("Fan broken", ComplaintCategory::Facility))
            .await
            .unwrap();

        storage
            .update_complaint_status_impl(
                school.id,
                created.id,
                ComplaintStatus::Open,
                ComplaintStatus::Resolved,
                Some("Fan replaced".to_string()),
            )
            .await
            .unwrap()
            .unwrap();

        // 第二个请求仍以为投诉处于 open
        let err = storage
            .update_complaint_status_impl(
                school.id,
                created.id,
                ComplaintStatus::Open,
                ComplaintStatus::Rejected,
                Some("Not our problem".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::InvalidState(_)));

        let current = storage
            .get_complaint_impl(school.id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, ComplaintStatus::Resolved);
        assert_eq!(current.resolution.as_deref(), Some("Fan replaced"));
    }
}
