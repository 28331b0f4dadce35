pub mod extractor;
pub mod grading;
pub mod parameter_error_handler;
pub mod receipt;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeAcademicYearIdI64, SafeClassIdI64, SafeComplaintIdI64, SafeExamIdI64, SafeFeeIdI64,
    SafeHouseIdI64, SafeNoticeIdI64, SafeSchoolIdI64, SafeStudentIdI64, SafeSubjectIdI64,
    SafeSuspensionIdI64, SafeTermIdI64,
};
pub use grading::{competition_ranks, letter_grade, percentage, round2, score_desc};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
