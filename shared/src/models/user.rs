//! User Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Waiter,
    Cook,
}

impl Role {
    /// Roles allowed to edit the floor map and the product catalogue
    pub fn can_manage(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Roles allowed to take payments
    pub fn can_take_payment(self) -> bool {
        !matches!(self, Self::Cook)
    }
}

/// Staff account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Create / update user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    /// Only sent when creating a user or changing the password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage());
        assert!(!Role::Waiter.can_manage());
        assert!(Role::Waiter.can_take_payment());
        assert!(!Role::Cook.can_take_payment());
    }

    #[test]
    fn test_password_not_serialized_when_absent() {
        let input = UserInput {
            username: "ana".to_string(),
            email: None,
            role: Role::Waiter,
            password: None,
            active: true,
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"WAITER\""));
    }
}
