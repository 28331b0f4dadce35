use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储层接口
///
/// 除学校本身外，所有方法都带 `school_id`，其他学校的数据一律视为不存在。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学校管理方法
    async fn create_school(&self, req: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<PaginatedResponse<School>>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;
    async fn delete_school(&self, id: i64) -> Result<bool>;

    /// 学年管理方法
    async fn create_academic_year(
        &self,
        school_id: i64,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear>;
    async fn get_academic_year(&self, school_id: i64, id: i64) -> Result<Option<AcademicYear>>;
    async fn list_academic_years(&self, school_id: i64) -> Result<Vec<AcademicYear>>;
    async fn update_academic_year(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn delete_academic_year(&self, school_id: i64, id: i64) -> Result<bool>;
    // 设为当前学年，同时清除其他学年的标记
    async fn activate_academic_year(&self, school_id: i64, id: i64)
    -> Result<Option<AcademicYear>>;
    async fn get_current_academic_year(&self, school_id: i64) -> Result<Option<AcademicYear>>;

    /// 学期管理方法
    async fn create_term(&self, school_id: i64, year_id: i64, req: CreateTermRequest)
    -> Result<Term>;
    async fn get_term(&self, school_id: i64, id: i64) -> Result<Option<Term>>;
    async fn list_terms(&self, school_id: i64, year_id: i64) -> Result<Vec<Term>>;
    async fn update_term(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateTermRequest,
    ) -> Result<Option<Term>>;
    async fn delete_term(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 考试管理方法
    async fn create_exam(&self, school_id: i64, term_id: i64, req: CreateExamRequest)
    -> Result<Exam>;
    async fn get_exam(&self, school_id: i64, id: i64) -> Result<Option<Exam>>;
    async fn list_exams(&self, school_id: i64, term_id: i64) -> Result<Vec<Exam>>;
    async fn update_exam(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>>;
    async fn delete_exam(&self, school_id: i64, id: i64) -> Result<bool>;
    // 某学年所有学期下的考试 ID
    async fn list_exam_ids_for_year(&self, school_id: i64, year_id: i64) -> Result<Vec<i64>>;

    /// 班级管理方法
    async fn create_class(&self, school_id: i64, req: CreateClassRequest) -> Result<Class>;
    async fn get_class(&self, school_id: i64, id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self, school_id: i64, query: ClassListQuery) -> Result<Vec<Class>>;
    async fn update_class(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, school_id: i64, id: i64) -> Result<bool>;
    // 班级在读学生数
    async fn count_active_students(&self, school_id: i64, class_id: i64) -> Result<i64>;
    // 年级高于 grade_level 的最近班级
    async fn find_next_grade_class(&self, school_id: i64, grade_level: i32)
    -> Result<Option<Class>>;

    /// 科目管理方法
    async fn create_subject(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSubjectRequest,
    ) -> Result<Subject>;
    async fn get_subject(&self, school_id: i64, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self, school_id: i64, class_id: i64) -> Result<Vec<Subject>>;
    async fn update_subject(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, school_id: i64, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student(&self, school_id: i64, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        school_id: i64,
        query: StudentListQuery,
    ) -> Result<PaginatedResponse<Student>>;
    // 班级在读学生，按学号排序
    async fn list_active_class_students(
        &self,
        school_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, school_id: i64, id: i64) -> Result<bool>;
    async fn set_student_house(
        &self,
        school_id: i64,
        student_id: i64,
        house_id: Option<i64>,
    ) -> Result<Option<Student>>;

    /// 考勤方法
    // 按 (学生, 日期) 批量写入或覆盖
    async fn upsert_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_class_attendance(
        &self,
        school_id: i64,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn list_student_attendance_statuses(
        &self,
        school_id: i64,
        student_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceStatus>>;

    /// 收费方法
    async fn create_fee_structure(
        &self,
        school_id: i64,
        req: CreateFeeStructureRequest,
    ) -> Result<FeeStructure>;
    async fn get_fee_structure(&self, school_id: i64, id: i64) -> Result<Option<FeeStructure>>;
    async fn list_fee_structures(
        &self,
        school_id: i64,
        query: FeeStructureListQuery,
    ) -> Result<Vec<FeeStructure>>;
    async fn delete_fee_structure(&self, school_id: i64, id: i64) -> Result<bool>;
    // 在事务中校验余额后写入缴费记录，超出余额返回 Validation 错误
    async fn record_payment(
        &self,
        school_id: i64,
        fee: &FeeStructure,
        req: CreatePaymentRequest,
        receipt_no: String,
        paid_on: NaiveDate,
    ) -> Result<Payment>;
    async fn list_payments_with_pagination(
        &self,
        school_id: i64,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>>;
    // 学生在各收费项目上的已缴合计
    async fn sum_student_payments(
        &self,
        school_id: i64,
        student_id: i64,
        fee_ids: &[i64],
    ) -> Result<HashMap<i64, i64>>;

    /// 成绩方法
    async fn upsert_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        subject: &Subject,
        entries: Vec<MarkEntry>,
    ) -> Result<Vec<Mark>>;
    async fn list_marks(
        &self,
        school_id: i64,
        exam_id: i64,
        query: MarkListQuery,
    ) -> Result<Vec<Mark>>;
    async fn list_exam_marks_for_students(
        &self,
        school_id: i64,
        exam_id: i64,
        student_ids: &[i64],
    ) -> Result<Vec<Mark>>;
    // 按 (学生, 科目) 汇总若干场考试的得分
    async fn aggregate_marks(
        &self,
        school_id: i64,
        exam_ids: &[i64],
        student_ids: &[i64],
        subject_ids: &[i64],
    ) -> Result<Vec<MarkTotal>>;

    /// 升级方法
    async fn promotion_applied(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<bool>;
    // 班级在读且该学年还没有升级记录的学生
    async fn list_promotion_candidates(
        &self,
        school_id: i64,
        academic_year_id: i64,
        class_id: i64,
    ) -> Result<Vec<Student>>;
    async fn apply_promotion(
        &self,
        school_id: i64,
        plan: PromotionPlan,
    ) -> Result<Vec<PromotionRecord>>;
    async fn list_promotion_records(
        &self,
        school_id: i64,
        query: PromotionRecordQuery,
    ) -> Result<Vec<PromotionRecord>>;

    /// 通知方法
    async fn create_notice(
        &self,
        school_id: i64,
        req: CreateNoticeRequest,
        publish_on: NaiveDate,
    ) -> Result<Notice>;
    async fn get_notice(&self, school_id: i64, id: i64) -> Result<Option<Notice>>;
    async fn list_notices_with_pagination(
        &self,
        school_id: i64,
        query: NoticeListQuery,
    ) -> Result<PaginatedResponse<Notice>>;
    async fn update_notice(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateNoticeRequest,
    ) -> Result<Option<Notice>>;
    async fn delete_notice(&self, school_id: i64, id: i64) -> Result<bool>;

    /// 投诉方法
    async fn create_complaint(
        &self,
        school_id: i64,
        req: CreateComplaintRequest,
    ) -> Result<Complaint>;
    async fn get_complaint(&self, school_id: i64, id: i64) -> Result<Option<Complaint>>;
    async fn list_complaints_with_pagination(
        &self,
        school_id: i64,
        query: ComplaintListQuery,
    ) -> Result<PaginatedResponse<Complaint>>;
    // 当前状态已不是 expected 时返回 InvalidState 错误
    async fn update_complaint_status(
        &self,
        school_id: i64,
        id: i64,
        expected: ComplaintStatus,
        status: ComplaintStatus,
        resolution: Option<String>,
    ) -> Result<Option<Complaint>>;

    /// 学院方法
    async fn create_house(&self, school_id: i64, req: CreateHouseRequest) -> Result<House>;
    async fn get_house(&self, school_id: i64, id: i64) -> Result<Option<House>>;
    async fn list_houses_with_counts(&self, school_id: i64) -> Result<Vec<HouseWithCount>>;
    async fn update_house(
        &self,
        school_id: i64,
        id: i64,
        update: UpdateHouseRequest,
    ) -> Result<Option<House>>;
    async fn delete_house(&self, school_id: i64, id: i64) -> Result<bool>;
    // 尚未分配学院的在读学生，按学号排序
    async fn list_students_without_house(
        &self,
        school_id: i64,
        class_id: Option<i64>,
    ) -> Result<Vec<Student>>;
    async fn assign_houses(&self, school_id: i64, assignments: &[HouseAssignment]) -> Result<()>;

    /// 停学方法
    // 与同一学生的生效停学重叠时返回 Conflict 错误
    async fn create_suspension(
        &self,
        school_id: i64,
        req: CreateSuspensionRequest,
    ) -> Result<Suspension>;
    async fn get_suspension(&self, school_id: i64, id: i64) -> Result<Option<Suspension>>;
    async fn list_suspensions_with_pagination(
        &self,
        school_id: i64,
        query: SuspensionListQuery,
    ) -> Result<PaginatedResponse<Suspension>>;
    // 撤销非生效状态的停学返回 InvalidState 错误
    async fn revoke_suspension(
        &self,
        school_id: i64,
        id: i64,
        reason: String,
    ) -> Result<Option<Suspension>>;
    async fn find_active_suspension(
        &self,
        school_id: i64,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Suspension>>;

    /// 系统方法
    async fn ping(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
