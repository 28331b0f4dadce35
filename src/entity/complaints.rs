//! 投诉实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: Option<i64>,
    pub complainant_name: String,
    pub category: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_complaint(self) -> crate::models::complaints::entities::Complaint {
        use crate::models::complaints::entities::{Complaint, ComplaintCategory, ComplaintStatus};

        Complaint {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            complainant_name: self.complainant_name,
            category: self
                .category
                .parse::<ComplaintCategory>()
                .unwrap_or(ComplaintCategory::Other),
            title: self.title,
            description: self.description,
            status: self
                .status
                .parse::<ComplaintStatus>()
                .unwrap_or(ComplaintStatus::Open),
            resolution: self.resolution,
            resolved_at: self.resolved_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
