pub mod auth_service;
pub mod fields;
pub mod school_service;
pub mod user_service;

pub use auth_service::{seed_super_admin, AuthService, SeedOutcome};
pub use school_service::SchoolService;
pub use user_service::{UserService, UserView};
