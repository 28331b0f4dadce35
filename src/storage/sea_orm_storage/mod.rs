//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academic_years;
mod attendance;
mod classes;
mod complaints;
mod fees;
mod houses;
mod marks;
mod notices;
mod promotions;
mod schools;
mod students;
mod suspensions;
#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用：内存 SQLite，单连接并执行迁移
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| SchoolHubError::database_config(e.to_string()))?
            .foreign_keys(true);
        // 内存库随连接销毁，必须保持唯一且常驻的连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(e.to_string()))?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    academic_years::{
        entities::{AcademicYear, Exam, Term},
        requests::{
            CreateAcademicYearRequest, CreateExamRequest, CreateTermRequest,
            UpdateAcademicYearRequest, UpdateExamRequest, UpdateTermRequest,
        },
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::AttendanceEntry,
    },
    classes::{
        entities::{Class, Subject},
        requests::{
            ClassListQuery, CreateClassRequest, CreateSubjectRequest, UpdateClassRequest,
            UpdateSubjectRequest,
        },
    },
    complaints::{
        entities::{Complaint, ComplaintStatus},
        requests::{ComplaintListQuery, CreateComplaintRequest},
    },
    fees::{
        entities::{FeeStructure, Payment},
        requests::{
            CreateFeeStructureRequest, CreatePaymentRequest, FeeStructureListQuery,
            PaymentListQuery,
        },
    },
    houses::{
        entities::House,
        requests::{CreateHouseRequest, UpdateHouseRequest},
        responses::{HouseAssignment, HouseWithCount},
    },
    marks::{
        entities::{Mark, MarkTotal},
        requests::{MarkEntry, MarkListQuery},
    },
    notices::{
        entities::Notice,
        requests::{CreateNoticeRequest, NoticeListQuery, UpdateNoticeRequest},
    },
    promotions::{
        entities::{PromotionPlan, PromotionRecord},
        requests::PromotionRecordQuery,
    },
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    suspensions::{
        entities::Suspension,
        requests::{CreateSuspensionRequest, SuspensionListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学校模块
    async fn create_school(&self, req: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(req).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>> {
        self.list_schools_with_pagination_impl(query).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    async fn delete_school(&self, id: i64) -> Result<bool> {
        self.delete_school_impl(id).await
    }

    // 学年模块
    async fn create_academic_year(
        &self,
        school_id: i64,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        self.create_academic_year_impl(school_id, req).await
    }

    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>> {
        self.get_academic_year_impl(school_id, id).await
    }

    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>> {
        self.list_academic_years_impl(school_id).await
    }

    async fn update_academic_year(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>> {
        self.update_academic_year_impl(school_id, id, update).await
    }

    async fn delete_academic_year(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_academic_year_impl(school_id, id).await
    }

    async fn activate_academic_year(
        &self,
        school_id: i64,
        id: i64,
    ) -> Result<Option<AcademicYear>> {
        self.activate_academic_year_impl(school_id, id).await
    }

    async fn get_current_academic_year(&self, school_id: i64) -> Result<Option<AcademicYear>> {
        self.get_current_academic_year_impl(school_id).await
    }

    // 学期模块
    async fn create_term(
        &self,
        school_id: i64,
        year_id: i64,
        req: CreateTermRequest,
    ) -> Result<Term> {
        self.create_term_impl(school_id, year_id, req).await
    }

    async fn get_term(&self, school_id: i64, id: i64) -> Result<Option<Term>> {
        self.get_term_impl(school_id, id).await
    }

    async fn list_terms(&self, school_id: i64, year_id: i64) -> Result<Vec<Term>> {
        self.list_terms_impl(school_id, year_id).await
    }

    async fn update_term(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>> {
        self.update_term_impl(school_id, id, update).await
    }

    async fn delete_term(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_term_impl(school_id, id).await
    }

    // 考试模块
    async fn create_exam(
        &self,
        school_id: i64,
        term_id: i64,
        req: CreateExamRequest,
    ) -> Result<Exam> {
        self.create_exam_impl(school_id, term_id, req).await
    }

    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>> {
        self.get_exam_impl(school_id, id).await
    }

    async fn list_exams(&self, school_id: i64, term_id: i64) -> Result<Vec<Exam>> {
        self.list_exams_impl(school_id, term_id).await
    }

    async fn update_exam(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        self.update_exam_impl(school_id, id, update).await
    }

    async fn delete_exam(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_exam_impl(school_id, id).await
    }

    async fn list_exam_ids_for_year(&self, school_id: i64, year_id: i64) -> Result<Vec<i64>> {
        self.list_exam_ids_for_year_impl(school_id, year_id).await
    }

    // 班级模块
    async fn create_class(&self, school_id: i64, req: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(school_id, req).await
    }

    async fn get_class(&self, school_id: i64, id: i64) -> Result<Option<Class>> {
        self.get_class_impl(school_id, id).await
    }

    async fn list_classes(&self, school_id: i64, query: ClassListQuery) -> Result<Vec<Class>> {
        self.list_classes_impl(school_id, query).await
    }

    async fn update_class(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(school_id, id, update).await
    }

    async fn delete_class(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_class_impl(school_id, id).await
    }

    async fn count_active_students(&self, school_id: i64, class_id: i64) -> Result<i64> {
        self.count_active_students_impl(school_id, class_id).await
    }

    async fn find_next_grade_class(
        &self,
        school_id: i64,
        grade_level: i32,
    ) -> Result<Option<Class>> {
        self.find_next_grade_class_impl(school_id, grade_level).await
    }

    // 科目模块
    async fn create_subject(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        self.create_subject_impl(school_id, class_id, req).await
    }

    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>> {
        self.get_subject_impl(school_id, id).await
    }

    async fn list_subjects(&self, school_id: i64, class_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_impl(school_id, class_id).await
    }

    async fn update_subject(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(school_id, id, update).await
    }

    async fn delete_subject(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_subject_impl(school_id, id).await
    }

    // 学生模块
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(school_id, req).await
    }

    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(school_id, id).await
    }

    async fn list_students_with_pagination(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>> {
        self.list_students_with_pagination_impl(school_id, query)
            .await
    }

    async fn list_active_class_students(
        &self,
        school_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>> {
        self.list_active_class_students_impl(school_id, class_id)
            .await
    }

    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(school_id, id, update).await
    }

    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_student_impl(school_id, id).await
    }

    async fn set_student_house(
        &self,
        school_id: i64,
        student_id: i64,
        house_id: Option<i64>,
    ) -> Result<Option<Student>> {
        self.set_student_house_impl(school_id, student_id, house_id)
            .await
    }

    // 考勤模块
    async fn upsert_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.upsert_attendance_impl(school_id, class_id, date, entries)
            .await
    }

    async fn list_class_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_class_attendance_impl(school_id, class_id, date)
            .await
    }

    async fn list_student_attendance_statuses(
        &self,
        school_id: i64,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceStatus>> {
        self.list_student_attendance_statuses_impl(school_id, student_id, from, to)
            .await
    }

    // 收费模块
    async fn create_fee_structure(
        &self,
        school_id: i64,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure> {
        self.create_fee_structure_impl(school_id, req).await
    }

    async fn get_fee_structure(&self, school_id: i64, id: i64) -> Result<Option<FeeStructure>> {
        self.get_fee_structure_impl(school_id, id).await
    }

    async fn list_fee_structures(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>> {
        self.list_fee_structures_impl(school_id, query).await
    }

    async fn delete_fee_structure(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_fee_structure_impl(school_id, id).await
    }

    async fn record_payment(
        &self,
        school_id: i64,
        fee: &FeeStructure,
        req: CreatePaymentRequest,
        receipt_no: String,
        paid_on: NaiveDate,
    ) -> Result<Payment> {
        self.record_payment_impl(school_id, fee, req, receipt_no, paid_on)
            .await
    }

    async fn list_payments_with_pagination(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>> {
        self.list_payments_with_pagination_impl(school_id, query)
            .await
    }

    async fn sum_student_payments(
        &self,
        school_id: i64,
        student_id: i64,
        fee_ids: &[i64],
    ) -> Result<HashMap<i64, i64>> {
        self.sum_student_payments_impl(school_id, student_id, fee_ids)
            .await
    }

    // 成绩模块
    async fn upsert_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        subject: &Subject,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>> {
        self.upsert_marks_impl(school_id, exam_id, subject, entries)
            .await
    }

    async fn list_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        query: MarkListQuery,
    ) -> Result<Vec<Mark>> {
        self.list_marks_impl(school_id, exam_id, query).await
    }

    async fn list_exam_marks_for_students(
        &self,
        school_id: i64,
        exam_id: i64,
        student_ids: &[i64],
    ) -> Result<Vec<Mark>> {
        self.list_exam_marks_for_students_impl(school_id, exam_id, student_ids)
            .await
    }

    async fn aggregate_marks(
        &self,
        school_id: i64,
        exam_ids: &[i64],
        student_ids: &[i64],
        subject_ids: &[i64],
    ) -> Result<Vec<MarkTotal>> {
        self.aggregate_marks_impl(school_id, exam_ids, student_ids, subject_ids)
            .await
    }

    // 升级模块
    async fn promotion_applied(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        self.promotion_applied_impl(school_id, academic_year_id, class_id)
            .await
    }

    async fn list_promotion_candidates(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>> {
        self.list_promotion_candidates_impl(school_id, academic_year_id, class_id)
            .await
    }

    async fn apply_promotion(
        &self,
        school_id: i64,
        plan: PromotionPlan,
    ) -> Result<Vec<PromotionRecord>> {
        self.apply_promotion_impl(school_id, plan).await
    }

    async fn list_promotion_records(
        &self,
        school_id: i64,
        query: PromotionRecordQuery,
    ) -> Result<Vec<PromotionRecord>> {
        self.list_promotion_records_impl(school_id, query).await
    }

    // 通知模块
    async fn create_notice(
        &self,
        school_id: i64,
        req: CreateNoticeRequest,
        publish_on: NaiveDate,
    ) -> Result<Notice> {
        self.create_notice_impl(school_id, req, publish_on).await
    }

    async fn get_notice(&self, school_id: i64, id: i64) -> Result<Option<Notice>> {
        self.get_notice_impl(school_id, id).await
    }

    async fn list_notices_with_pagination(
        &self,
        school_id: i64,
        query: NoticeListQuery,
    ) -> Result<PaginatedResponse<Notice>> {
        self.list_notices_with_pagination_impl(school_id, query)
            .await
    }

    async fn update_notice(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateNoticeRequest,
    ) -> Result<Option<Notice>> {
        self.update_notice_impl(school_id, id, update).await
    }

    async fn delete_notice(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_notice_impl(school_id, id).await
    }

    // 投诉模块
    async fn create_complaint(
        &self,
        school_id: i64,
        req: CreateComplaintRequest,
    ) -> Result<Complaint> {
        self.create_complaint_impl(school_id, req).await
    }

    async fn get_complaint(&self, school_id: i64, id: i64) -> Result<Option<Complaint>> {
        self.get_complaint_impl(school_id, id).await
    }

    async fn list_complaints_with_pagination(
        &self,
        school_id: i64,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>> {
        self.list_complaints_with_pagination_impl(school_id, query)
            .await
    }

    async fn update_complaint_status(
        &self,
        school_id: i64,
        id: i64,
        expected: ComplaintStatus,
        status: ComplaintStatus,
        resolution: Option<String>,
    ) -> Result<Option<Complaint>> {
        self.update_complaint_status_impl(school_id, id, expected, status, resolution)
            .await
    }

    // 学院模块
    async fn create_house(&self, school_id: i64, req: CreateHouseRequest) -> Result<House> {
        self.create_house_impl(school_id, req).await
    }

    async fn get_house(&self, school_id: i64, id: i64) -> Result<Option<House>> {
        self.get_house_impl(school_id, id).await
    }

    async fn list_houses_with_counts(&self, school_id: i64) -> Result<Vec<HouseWithCount>> {
        self.list_houses_with_counts_impl(school_id).await
    }

    async fn update_house(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateHouseRequest,
    ) -> Result<Option<House>> {
        self.update_house_impl(school_id, id, update).await
    }

    async fn delete_house(&self, school_id: i64, id: i64) -> Result<bool> {
        self.delete_house_impl(school_id, id).await
    }

    async fn list_students_without_house(
        &self,
        school_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>> {
        self.list_students_without_house_impl(school_id, class_id)
            .await
    }

    async fn assign_houses(&self, school_id: i64, assignments: &[HouseAssignment]) -> Result<()> {
        self.assign_houses_impl(school_id, assignments).await
    }

    // 停学模块
    async fn create_suspension(
        &self,
        school_id: i64,
        req: CreateSuspensionRequest,
    ) -> Result<Suspension> {
        self.create_suspension_impl(school_id, req).await
    }

    async fn get_suspension(&self, school_id: i64, id: i64) -> Result<Option<Suspension>> {
        self.get_suspension_impl(school_id, id).await
    }

    async fn list_suspensions_with_pagination(
        &self,
        school_id: i64,
        query: SuspensionListQuery,
    ) -> Result<PaginatedResponse<Suspension>> {
        self.list_suspensions_with_pagination_impl(school_id, query)
            .await
    }

    async fn revoke_suspension(
        &self,
        school_id: i64,
        id: i64,
        reason: String,
    ) -> Result<Option<Suspension>> {
        self.revoke_suspension_impl(school_id, id, reason).await
    }

    async fn find_active_suspension(
        &self,
        school_id: i64,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Suspension>> {
        self.find_active_suspension_impl(school_id, student_id, date)
            .await
    }

    // 系统模块
    async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("数据库不可用: {e}")))?;
        Ok(())
    }
}
