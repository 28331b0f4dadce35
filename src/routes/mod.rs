pub mod academic_years;

pub mod attendance;

pub mod classes;

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

pub use academic_years::configure_academic_year_routes;
pub use attendance::configure_attendance_routes;
pub use classes::configure_classes_routes;
pub use complaints::configure_complaint_routes;
pub use fees::configure_fee_routes;
pub use houses::configure_house_routes;
pub use notices::configure_notice_routes;
pub use promotions::configure_promotion_routes;
pub use schools::configure_school_routes;
pub use students::configure_student_routes;
pub use suspensions::configure_suspension_routes;
pub use system::configure_system_routes;
