//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub audience: String,
    pub class_id: Option<i64>,
    pub publish_on: chrono::NaiveDate,
    pub expires_on: Option<chrono::NaiveDate>,
    pub is_pinned: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notice(self) -> crate::models::notices::entities::Notice {
        use crate::models::notices::entities::{Notice, NoticeAudience};

        Notice {
            id: self.id,
            school_id: self.school_id,
            title: self.title,
            body: self.body,
            audience: self
                .audience
                .parse::<NoticeAudience>()
                .unwrap_or(NoticeAudience::All),
            class_id: self.class_id,
            publish_on: self.publish_on,
            expires_on: self.expires_on,
            is_pinned: self.is_pinned,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
