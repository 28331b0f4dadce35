//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub amount: i64,
    pub method: String,
    #[sea_orm(unique)]
    pub receipt_no: String,
    pub paid_on: chrono::NaiveDate,
    pub note: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_structures::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structures::Column::Id"
    )]
    FeeStructure,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructure.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::fees::entities::Payment {
        use crate::models::fees::entities::{Payment, PaymentMethod};

        Payment {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            fee_structure_id: self.fee_structure_id,
            amount: self.amount,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Cash),
            receipt_no: self.receipt_no,
            paid_on: self.paid_on,
            note: self.note,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
