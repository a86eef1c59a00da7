/// User model and creation input
///
/// Users are created once and listed; there is no update or delete path.
/// Email addresses are unique across the collection.
///
/// # Example
///
/// ```
/// use taskflow_shared::models::user::{User, UserCreate};
///
/// let user = User::new(UserCreate {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     role: None,
/// });
///
/// assert_eq!(user.role, "user");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role given to users created without one
pub const DEFAULT_ROLE: &str = "user";

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4 text)
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Free-form role label
    pub role: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user with a fresh id and creation time
    pub fn new(data: UserCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            email: data.email,
            role: data.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            created_at: super::now(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role (default: "user")
    #[serde(default)]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_role() {
        let user = User::new(UserCreate {
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role: None,
        });

        assert_eq!(user.role, DEFAULT_ROLE);
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_new_user_keeps_explicit_role() {
        let user = User::new(UserCreate {
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Some("admin".to_string()),
        });

        assert_eq!(user.role, "admin");
    }

    #[test]
    fn test_user_create_requires_name_and_email() {
        let missing_email: Result<UserCreate, _> = serde_json::from_str(r#"{"name":"A"}"#);
        assert!(missing_email.is_err());

        let missing_name: Result<UserCreate, _> = serde_json::from_str(r#"{"email":"a@b.c"}"#);
        assert!(missing_name.is_err());

        // Presence is all that is checked
        let empty: UserCreate = serde_json::from_str(r#"{"name":"","email":""}"#).unwrap();
        assert!(empty.validate().is_ok());
    }
}
