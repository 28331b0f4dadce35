pub mod require_school;

pub use require_school::RequireSchool;
