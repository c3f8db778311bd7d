//! Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Account role. Stored and transmitted as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum Role {
    Admin = 0,
    Manager = 1,
    Teacher = 2,
    Student = 3,
}

impl Role {
    /// Label used in user-facing messages ("Đã xóa thành công 3 giáo viên").
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "quản lý",
            Role::Teacher => "giáo viên",
            Role::Student => "học sinh",
        }
    }

    /// Capitalised label for the start of a sentence.
    pub fn title(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Quản lý",
            Role::Teacher => "Giáo viên",
            Role::Student => "Học sinh",
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role as i16
    }
}

impl TryFrom<i16> for Role {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Admin),
            1 => Ok(Role::Manager),
            2 => Ok(Role::Teacher),
            3 => Ok(Role::Student),
            other => Err(format!("unknown role code {}", other)),
        }
    }
}

/// Ids payload shared by delete and reset-password requests.
#[derive(Debug, Clone, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<i64>,
}

/// Body of the bulk status toggle endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub ids: Vec<i64>,
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_as_code() {
        assert_eq!(serde_json::to_value(Role::Teacher).unwrap(), serde_json::json!(2));
        let role: Role = serde_json::from_value(serde_json::json!(1)).unwrap();
        assert_eq!(role, Role::Manager);
        assert!(serde_json::from_value::<Role>(serde_json::json!(9)).is_err());
    }
}
