use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::Role;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<i16>,
    pub dob: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a user row that does not exist yet. `password` is
/// already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub user_name: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<i16>,
    pub dob: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub status: bool,
}
