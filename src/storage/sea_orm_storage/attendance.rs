//! 考勤存储操作

use super::{SeaOrmStorage, now_ts};
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::errors::{Result, SchoolHubError};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus},
    requests::AttendanceEntry,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量写入考勤，同一学生同一天已有记录时覆盖
    pub async fn upsert_attendance_impl(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let existing = Attendance::find()
                .filter(Column::SchoolId.eq(school_id))
                .filter(Column::StudentId.eq(entry.student_id))
                .filter(Column::Date.eq(date))
                .one(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询考勤失败: {e}")))?;

            let model = match existing {
                Some(row) => {
                    let mut active: ActiveModel = row.into();
                    active.class_id = Set(class_id);
                    active.status = Set(entry.status.to_string());
                    active.remark = Set(entry.remark);
                    active.recorded_at = Set(now);
                    active.update(&txn).await
                }
                None => {
                    ActiveModel {
                        school_id: Set(school_id),
                        student_id: Set(entry.student_id),
                        class_id: Set(class_id),
                        date: Set(date),
                        status: Set(entry.status.to_string()),
                        remark: Set(entry.remark),
                        recorded_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                }
            }
            .map_err(|e| SchoolHubError::from_db("保存考勤失败", e))?;

            saved.push(model.into_record());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved)
    }

    /// 某班某日的考勤记录
    pub async fn list_class_attendance_impl(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = Attendance::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 学生在日期区间内的考勤状态
    pub async fn list_student_attendance_statuses_impl(
        &self,
        school_id: i64,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceStatus>> {
        let mut select = Attendance::find()
            .select_only()
            .column(Column::Status)
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::StudentId.eq(student_id));

        if let Some(from) = from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(Column::Date.lte(to));
        }

        let rows: Vec<String> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤统计失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|s| s.parse::<AttendanceStatus>().ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{d, seed_class, seed_school, seed_student};

    fn entry(student_id: i64, status: AttendanceStatus) -> AttendanceEntry {
        AttendanceEntry {
            student_id,
            status,
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_day() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "ATT").await;
        let class = seed_class(&storage, school.id, "Grade 1", 1).await;
        let student = seed_student(&storage, school.id, class.id, "A-1").await;
        let day = d(2025, 5, 5);

        storage
            .upsert_attendance_impl(school.id, class.id, day, vec![entry(student.id, AttendanceStatus::Absent)])
            .await
            .unwrap();
        storage
            .upsert_attendance_impl(school.id, class.id, day, vec![entry(student.id, AttendanceStatus::Late)])
            .await
            .unwrap();

        let sheet = storage
            .list_class_attendance_impl(school.id, class.id, day)
            .await
            .unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[0].status, AttendanceStatus::Late);
    }

    #[tokio::test]
    async fn test_statuses_respect_date_range() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let school = seed_school(&storage, "RNG").await;
        let class = seed_class(&storage, school.id, "Grade 1", 1).await;
        let student = seed_student(&storage, school.id, class.id, "A-1").await;

        for (day, status) in [
            (1, AttendanceStatus::Present),
            (2, AttendanceStatus::Absent),
            (3, AttendanceStatus::Present),
        ] {
            storage
                .upsert_attendance_impl(school.id, class.id, d(2025, 5, day), vec![entry(student.id, status)])
                .await
                .unwrap();
        }

        let all = storage
            .list_student_attendance_statuses_impl(school.id, student.id, None, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let ranged = storage
            .list_student_attendance_statuses_impl(
                school.id,
                student.id,
                Some(d(2025, 5, 2)),
                Some(d(2025, 5, 3)),
            )
            .await
            .unwrap();
        assert_eq!(ranged.len(), 2);
        assert!(ranged.contains(&AttendanceStatus::Absent));
    }
}
