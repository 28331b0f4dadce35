//! 通知存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::notices::{ActiveModel, Column, Entity as Notices};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest},
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_notice_impl(
        &self,
        school_id: i64,
        req: CreateNoticeRequest,
        publish_on: NaiveDate,
    ) -> Result<Notice> {
        let now = now_ts();
        let model = ActiveModel {
            school_id: Set(school_id),
            title: Set(req.title.trim().to_string()),
            body: Set(req.body),
            audience: Set(req.audience.to_string()),
            class_id: Set(req.class_id),
            publish_on: Set(publish_on),
            expires_on: Set(req.expires_on),
            is_pinned: Set(req.is_pinned.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建通知失败", e))?;

        Ok(result.into_notice())
    }

    pub async fn get_notice_impl(&self, school_id: i64, id: i64) -> Result<Option<Notice>> {
        let result = Notices::find_by_id(id)
            .filter(Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知失败: {e}")))?;

        Ok(result.map(|m| m.into_notice()))
    }

    /// 置顶优先，其次按发布日期倒序
    pub async fn list_notices_with_pagination_impl(
        &self,
        school_id: i64,
        query: NoticeListQuery,
    ) -> Result<PaginatedResponse<Notice>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Notices::find().filter(Column::SchoolId.eq(school_id));

        if let Some(audience) = query.audience {
            select = select.filter(Column::Audience.eq(audience.as_str()));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(day) = query.active_on {
            select = select.filter(Column::PublishOn.lte(day)).filter(
                Condition::any()
                    .add(Column::ExpiresOn.is_null())
                    .add(Column::ExpiresOn.gte(day)),
            );
        }

        select = select
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::PublishOn)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知页数失败: {e}")))?;
        let notices = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: notices.into_iter().map(|m| m.into_notice()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_notice_impl(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateNoticeRequest,
    ) -> Result<Option<Notice>> {
        if self.get_notice_impl(school_id, id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(body) = update.body {
            model.body = Set(body);
        }
        if let Some(audience) = update.audience {
            model.audience = Set(audience.to_string());
        }
        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }
        if let Some(publish_on) = update.publish_on {
            model.publish_on = Set(publish_on);
        }
        if let Some(expires_on) = update.expires_on {
            model.expires_on = Set(Some(expires_on));
        }
        if let Some(is_pinned) = update.is_pinned {
            model.is_pinned = Set(is_pinned);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新通知失败", e))?;

        Ok(Some(result.into_notice()))
    }

    pub async fn delete_notice_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = Notices::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notices::entities::NoticeAudience;
    use crate::storage::sea_orm_storage::test_support::{d, seed_school};

    fn notice(title: &str, expires_on: Option<NaiveDate>, pinned: bool) -> CreateNoticeRequest {
        CreateNoticeRequest {
            title: title.to_string(),
            body: "body".to_string(),
            audience: NoticeAudience::All,
            class_id: None,
            publish_on: None,
            expires_on,
            is_pinned: Some(pinned),
        }
    }

    #[tokio::test]
    async fn test_active_filter_and_pinned_first() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "NTC").await;

        storage
            .create_notice_impl(school.id, notice("Old", Some(d(2025, 5, 10)), false), d(2025, 5, 1))
            .await
            .unwrap();
        storage
            .create_notice_impl(school.id, notice("Pinned", None, true), d(2025, 5, 2))
            .await
            .unwrap();
        storage
            .create_notice_impl(school.id, notice("Recent", None, false), d(2025, 5, 20))
            .await
            .unwrap();

        let all = storage
            .list_notices_with_pagination_impl(school.id, NoticeListQuery::default())
            .await
            .unwrap();
        let titles: Vec<_> = all.items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Pinned", "Recent", "Old"]);

        let active = storage
            .list_notices_with_pagination_impl(
                school.id,
                NoticeListQuery {
                    active_on: Some(d(2025, 5, 15)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let titles: Vec<_> = active.items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Pinned"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_are_school_scoped() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "NT1").await;
        let other = seed_school(&storage, "NT2").await;
        let created = storage
            .create_notice_impl(school.id, notice("Holiday", None, false), d(2025, 5, 1))
            .await
            .unwrap();

        let missing = storage
            .update_notice_impl(other.id, created.id, UpdateNoticeRequest::default())
            .await
            .unwrap();
        assert!(missing.is_none());

        let updated = storage
            .update_notice_impl(
                school.id,
                created.id,
                UpdateNoticeRequest {
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_pinned);
        assert_eq!(updated.title, "Holiday");

        assert!(!storage.delete_notice_impl(other.id, created.id).await.unwrap());
        assert!(storage.delete_notice_impl(school.id, created.id).await.unwrap());
    }
}
