pub mod schools;
pub mod session;
pub mod teachers;
pub mod users;
