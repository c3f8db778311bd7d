pub mod school;
pub mod teacher_profile;
pub mod user;

pub use school::School;
pub use teacher_profile::{TeacherProfileFields, TeacherRecord};
pub use user::{NewUser, User};
