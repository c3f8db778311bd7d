use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::User;

/// Teacher-only attributes, stored 1:1 with a `users` row in `teacher_profiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfileFields {
    pub gems_employee: Option<i16>,
    pub education_level: Option<i16>,
    pub informatic_relation: Option<i16>,
    pub nvsp: Option<i16>,
    pub ic3_certificate: Option<i16>,
    pub icdl_certificate: Option<i16>,
}

/// A teacher as listed and exported: the user row joined with its profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeacherRecord {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub user: User,
    #[serde(rename = "teacherProfile")]
    #[sqlx(flatten)]
    pub profile: TeacherProfileFields,
}
