//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod academic_years;
pub mod attendance;
pub mod classes;
pub mod complaints;
pub mod exams;
pub mod fee_structures;
pub mod houses;
pub mod marks;
pub mod notices;
pub mod payments;
pub mod promotion_records;
pub mod schools;
pub mod students;
pub mod subjects;
pub mod suspensions;
pub mod terms;

use chrono::{DateTime, Utc};

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
