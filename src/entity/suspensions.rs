//! 停学实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suspensions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub revoke_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_suspension(self) -> crate::models::suspensions::entities::Suspension {
        use crate::models::suspensions::entities::{Suspension, SuspensionStatus};

        Suspension {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            reason: self.reason,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self
                .status
                .parse::<SuspensionStatus>()
                .unwrap_or(SuspensionStatus::Revoked),
            revoke_reason: self.revoke_reason,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
