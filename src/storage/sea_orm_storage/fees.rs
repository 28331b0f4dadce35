//! 收费、缴费存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, now_ts};
use crate::entity::fee_structures::{
    ActiveModel as FeeActiveModel, Column as FeeColumn, Entity as FeeStructures,
};
use crate::entity::payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as Payments,
};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse, PaginationInfo, normalize_page,
    fees::{
        entities::{FeeStructure, Payment},
        requests::{
            CreateFeeStructureRequest, CreatePaymentRequest, FeeStructureListQuery,
            PaymentListQuery,
        },
    },
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 逐条累加金额（避免不同数据库 SUM 返回类型不一致）
async fn paid_amounts<C: ConnectionTrait>(
    conn: &C,
    school_id: i64,
    student_id: i64,
    fee_ids: &[i64],
) -> Result<HashMap<i64, i64>> {
    let rows: Vec<(i64, i64)> = Payments::find()
        .select_only()
        .column(PaymentColumn::FeeStructureId)
        .column(PaymentColumn::Amount)
        .filter(PaymentColumn::SchoolId.eq(school_id))
        .filter(PaymentColumn::StudentId.eq(student_id))
        .filter(PaymentColumn::FeeStructureId.is_in(fee_ids.iter().copied()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询缴费记录失败: {e}")))?;

    let mut totals = HashMap::new();
    for (fee_id, amount) in rows {
        *totals.entry(fee_id).or_insert(0) += amount;
    }
    Ok(totals)
}

impl SeaOrmStorage {
    pub async fn create_fee_structure_impl(
        &self,
        school_id: i64,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure> {
        let now = now_ts();
        let model = FeeActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            academic_year_id: Set(req.academic_year_id),
            title: Set(req.title.trim().to_string()),
            amount: Set(req.amount),
            due_date: Set(req.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::from_db("创建收费项目失败", e))?;

        Ok(result.into_fee_structure())
    }

    pub async fn get_fee_structure_impl(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<FeeStructure>> {
        let result = FeeStructures::find_by_id(id)
            .filter(FeeColumn::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收费项目失败: {e}")))?;

        Ok(result.map(|m| m.into_fee_structure()))
    }

    pub async fn list_fee_structures_impl(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>> {
        let mut select = FeeStructures::find().filter(FeeColumn::SchoolId.eq(school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(FeeColumn::ClassId.eq(class_id));
        }
        if let Some(year_id) = query.academic_year_id {
            select = select.filter(FeeColumn::AcademicYearId.eq(year_id));
        }

        let fees = select
            .order_by_asc(FeeColumn::DueDate)
            .order_by_asc(FeeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询收费项目失败: {e}")))?;

        Ok(fees.into_iter().map(|m| m.into_fee_structure()).collect())
    }

    pub async fn delete_fee_structure_impl(&self, school_id: i64, id: i64) -> Result<bool> {
        let result = FeeStructures::delete_many()
            .filter(FeeColumn::Id.eq(id))
            .filter(FeeColumn::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除收费项目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 在事务中核对余额并写入缴费记录
    pub async fn record_payment_impl(
        &self,
        school_id: i64,
        fee: &FeeStructure,
        req: CreatePaymentRequest,
        receipt_no: String,
        paid_on: NaiveDate,
    ) -> Result<Payment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let paid = paid_amounts(&txn, school_id, req.student_id, &[fee.id])
            .await?
            .get(&fee.id)
            .copied()
            .unwrap_or(0);
        let balance = fee.amount - paid;
        if req.amount > balance {
            return Err(SchoolHubError::validation(format!(
                "Payment {} exceeds outstanding balance {}",
                req.amount, balance
            )));
        }

        let model = PaymentActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            fee_structure_id: Set(fee.id),
            amount: Set(req.amount),
            method: Set(req.method.to_string()),
            receipt_no: Set(receipt_no),
            paid_on: Set(paid_on),
            note: Set(req.note),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::from_db("写入缴费记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn list_payments_with_pagination_impl(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Payments::find().filter(PaymentColumn::SchoolId.eq(school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(PaymentColumn::StudentId.eq(student_id));
        }
        if let Some(fee_id) = query.fee_structure_id {
            select = select.filter(PaymentColumn::FeeStructureId.eq(fee_id));
        }

        select = select
            .order_by_desc(PaymentColumn::PaidOn)
            .order_by_desc(PaymentColumn::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费页数失败: {e}")))?;
        let payments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缴费列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: payments.into_iter().map(|m| m.into_payment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn sum_student_payments_impl(
        &self,
        school_id: i64,
        student_id: i64,
        fee_ids: &[i64],
    ) -> Result<HashMap<i64, i64>> {
        if fee_ids.is_empty() {
            return Ok(HashMap::new());
        }
        paid_amounts(&self.db, school_id, student_id, fee_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::PaymentMethod;
    use crate::storage::sea_orm_storage::test_support::{
        d, seed_class, seed_school, seed_student, seed_year,
    };

    fn payment(student_id: i64, fee_id: i64, amount: i64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            student_id,
            fee_structure_id: fee_id,
            amount,
            method: PaymentMethod::Cash,
            paid_on: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_payments_cannot_exceed_balance() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "FEE").await;
        let year = seed_year(&storage, school.id, "2025").await;
        let class = seed_class(&storage, school.id, "Grade 1", 1).await;
        let student = seed_student(&storage, school.id, class.id, "F-1").await;
        let fee = storage
            .create_fee_structure_impl(
                school.id,
                CreateFeeStructureRequest {
                    class_id: class.id,
                    academic_year_id: year.id,
                    title: "Tuition".to_string(),
                    amount: 10_000,
                    due_date: Some(d(2025, 6, 30)),
                },
            )
            .await
            .unwrap();

        storage
            .record_payment_impl(school.id, &fee, payment(student.id, fee.id, 6_000), "RCPT-A".into(), d(2025, 5, 1))
            .await
            .unwrap();
        let err = storage
            .record_payment_impl(school.id, &fee, payment(student.id, fee.id, 4_001), "RCPT-B".into(), d(2025, 5, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Validation(_)));

        storage
            .record_payment_impl(school.id, &fee, payment(student.id, fee.id, 4_000), "RCPT-C".into(), d(2025, 5, 3))
            .await
            .unwrap();

        let totals = storage
            .sum_student_payments_impl(school.id, student.id, &[fee.id])
            .await
            .unwrap();
        assert_eq!(totals.get(&fee.id), Some(&10_000));

        let listed = storage
            .list_payments_with_pagination_impl(
                school.id,
                PaymentListQuery {
                    student_id: Some(student.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items[0].receipt_no, "RCPT-C");
    }
}
