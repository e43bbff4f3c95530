//! User record.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// Placeholder name used when a record carries no name.
pub const DEFAULT_USER_NAME: &str = "default";

fn default_name() -> Option<String> {
    Some(DEFAULT_USER_NAME.to_string())
}

/// User record as stored in the primary store and in the cache.
///
/// The PascalCase aliases keep payloads written by the legacy service readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique identifier, also the cache key.
    #[serde(alias = "Id")]
    pub id: UserId,

    /// Display name.
    #[serde(default = "default_name", alias = "Name")]
    pub name: Option<String>,

    /// Age in years.
    #[serde(alias = "Age")]
    pub age: i32,
}

impl User {
    /// Creates a new user record.
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: Option<String>, age: i32) -> Self {
        Self {
            id: id.into(),
            name,
            age,
        }
    }

    /// Renders the human-readable line served by the HTTP boundary.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!(
            "User {}  Id={}  Age={}",
            self.name.as_deref().unwrap_or_default(),
            self.id,
            self.age
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let user = User::new(1, Some("Kirrik".to_string()), 23);
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Kirrik","age":23}"#);
    }

    #[test]
    fn test_missing_name_defaults_to_placeholder() {
        let user: User = serde_json::from_str(r#"{"id":3,"age":40}"#).unwrap();
        assert_eq!(user.name.as_deref(), Some(DEFAULT_USER_NAME));
    }

    #[test]
    fn test_explicit_null_name_is_kept() {
        let user: User = serde_json::from_str(r#"{"id":3,"name":null,"age":40}"#).unwrap();
        assert_eq!(user.name, None);
    }

    #[test]
    fn test_accepts_pascal_case_payload() {
        let user: User = serde_json::from_str(r#"{"Id":2,"Name":"Maximka","Age":32}"#).unwrap();
        assert_eq!(user, User::new(2, Some("Maximka".to_string()), 32));
    }

    #[test]
    fn test_rejects_payload_without_age() {
        assert!(serde_json::from_str::<User>(r#"{"id":2,"name":"x"}"#).is_err());
        assert!(serde_json::from_str::<User>("null").is_err());
    }

    #[test]
    fn test_display_line() {
        let user = User::new(2, Some("Maximka".to_string()), 32);
        assert_eq!(user.display_line(), "User Maximka  Id=2  Age=32");

        let anonymous = User::new(9, None, 1);
        assert_eq!(anonymous.display_line(), "User   Id=9  Age=1");
    }
}
