//! User model.

use serde::{Deserialize, Serialize};

/// A Twitter user as embedded in a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The numeric user id.
    pub id: i64,

    /// The `@` handle, without the `@`.
    pub screen_name: String,

    /// The display name.
    #[serde(default)]
    pub name: String,

    /// Profile bio.
    #[serde(default)]
    pub description: String,

    /// Free-form profile location.
    #[serde(default)]
    pub location: String,

    /// Interface language code (e.g. "en", "ja").
    #[serde(default, alias = "lang")]
    pub language: String,

    #[serde(default)]
    pub is_protected: bool,

    #[serde(default)]
    pub is_verified: bool,

    #[serde(default)]
    pub is_translator: bool,

    #[serde(default)]
    pub is_contributors_enabled: bool,

    #[serde(default)]
    pub is_geo_enabled: bool,

    #[serde(default)]
    pub statuses_count: i64,

    /// Number of accounts this user follows.
    #[serde(default)]
    pub friends_count: i64,

    #[serde(default)]
    pub followers_count: i64,

    #[serde(default)]
    pub favorites_count: i64,

    /// Number of lists this user is a member of.
    #[serde(default)]
    pub listed_count: i64,
}

impl User {
    /// Creates a user with the given id and screen name; all other fields are
    /// empty or zero.
    pub fn new(id: i64, screen_name: impl Into<String>) -> Self {
        Self {
            id,
            screen_name: screen_name.into(),
            name: String::new(),
            description: String::new(),
            location: String::new(),
            language: String::new(),
            is_protected: false,
            is_verified: false,
            is_translator: false,
            is_contributors_enabled: false,
            is_geo_enabled: false,
            statuses_count: 0,
            friends_count: 0,
            followers_count: 0,
            favorites_count: 0,
            listed_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserialize_minimal() {
        let json = r#"{"id": 42, "screen_name": "karno"}"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.screen_name, "karno");
        assert!(user.name.is_empty());
        assert!(!user.is_verified);
        assert_eq!(user.followers_count, 0);
    }

    #[test]
    fn test_user_deserialize_lang_alias() {
        let json = r#"{"id": 1, "screen_name": "a", "lang": "ja"}"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.language, "ja");
    }
}
