pub mod manager;
pub mod models;
pub mod school_repository;
pub mod user_repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use school_repository::{NewSchool, SchoolChanges, SchoolRepository};
pub use user_repository::{ProfileChanges, UserChanges, UserRepository};
