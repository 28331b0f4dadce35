pub mod academic_years;
pub mod attendance;
pub mod classes;
pub mod common;
pub mod complaints;
pub mod fees;
pub mod houses;
pub mod marks;
pub mod notices;
pub mod promotions;
pub mod schools;
pub mod students;
pub mod suspensions;
pub mod system;

pub use common::{
    ApiResponse, ErrorCode, ItemsResponse, PaginatedResponse, PaginationInfo, normalize_page,
};

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
