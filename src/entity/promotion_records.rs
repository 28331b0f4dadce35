//! 升级记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "promotion_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub academic_year_id: i64,
    pub from_class_id: i64,
    pub to_class_id: Option<i64>,
    pub average: Option<f64>,
    pub class_rank: Option<i32>,
    pub decision: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::promotions::entities::PromotionRecord {
        use crate::models::promotions::entities::{PromotionDecision, PromotionRecord};

        PromotionRecord {
            id: self.id,
            school_id: self.school_id,
            student_id: self.student_id,
            academic_year_id: self.academic_year_id,
            from_class_id: self.from_class_id,
            to_class_id: self.to_class_id,
            average: self.average,
            class_rank: self.class_rank.map(|r| r.max(0) as u32),
            decision: self
                .decision
                .parse::<PromotionDecision>()
                .unwrap_or(PromotionDecision::Repeat),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
