//! 学校存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建学校
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        let now = now_ts();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code),
            address: Set(req.address),
            phone: Set(req.phone),
            email: Set(req.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建学校失败", e))?;

        Ok(result.into_school())
    }

    /// 通过 ID 获取学校
    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校失败: {e}")))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 分页列出学校
    pub async fn list_schools_with_pagination_impl(
        &self,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Schools::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Code.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校页数失败: {e}")))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学校列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: schools.into_iter().map(|m| m.into_school()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新学校
    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
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
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("更新学校失败", e))?;

        self.get_school_by_id_impl(id).await
    }

    /// 删除学校（级联删除其全部数据）
    pub async fn delete_school_impl(&self, id: i64) -> Result<bool> {
        let result = Schools::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学校失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::seed_school;

    #[tokio::test]
    async fn test_create_and_search_schools() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        seed_school(&storage, "NORTH").await;
        seed_school(&storage, "SOUTH").await;

        let page = storage
            .list_schools_with_pagination_impl(SchoolListQuery {
                search: Some("nor".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].code, "NORTH");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        seed_school(&storage, "DUP").await;

        let err = storage
            .create_school_impl(CreateSchoolRequest {
                name: "Another".to_string(),
                code: "DUP".to_string(),
                address: None,
                phone: None,
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_school() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let updated = storage
            .update_school_impl(
                99,
                UpdateSchoolRequest {
                    name: Some("x".to_string()),
                    code: None,
                    address: None,
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
