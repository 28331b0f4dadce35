/// 业务错误码
///
/// 0 表示成功；1xxx 为通用错误；2xxx 起按业务模块划分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 学校
    SchoolNotFound = 2000,
    SchoolHeaderMissing = 2001,
    SchoolAlreadyExists = 2002,

    // 学年 / 学期 / 考试
    AcademicYearNotFound = 2100,
    NoCurrentAcademicYear = 2101,
    TermNotFound = 2110,
    ExamNotFound = 2120,

    // 班级 / 科目
    ClassNotFound = 2200,
    ClassFull = 2201,
    SubjectNotFound = 2210,

    // 学生
    StudentNotFound = 2300,
    StudentNotInClass = 2301,

    // 考勤
    AttendanceInvalid = 2400,

    // 收费
    FeeNotFound = 2500,
    PaymentExceedsBalance = 2501,

    // 成绩
    MarksInvalid = 2600,
    MarksNotFound = 2601,

    // 升级
    PromotionAlreadyApplied = 2700,
    PromotionNoExams = 2701,
    PromotionNoStudents = 2702,

    // 公告
    NoticeNotFound = 2800,

    // 投诉
    ComplaintNotFound = 2900,
    ComplaintInvalidTransition = 2901,

    // 学院
    HouseNotFound = 3000,

    // 停课
    SuspensionNotFound = 3100,
    SuspensionOverlap = 3101,
    SuspensionNotActive = 3102,
}
