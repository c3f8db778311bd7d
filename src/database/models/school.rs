use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: i64,
    pub name: String,
    /// 1 = primary, 2 = lower secondary
    pub education_level: i16,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub total_students: i32,
    pub start_date: Option<NaiveDate>,
    pub academic_manager_id: Option<i64>,
    pub technical_manager_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
