//! Account models: user profiles, account types and auth payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Spellings the backend uses for administrators. Profile endpoints return
/// the stored value, login/register return the display label.
const ADMIN_TYPES: [&str; 2] = ["admin", "مشرف"];

/// Spellings the backend uses for learners.
const LEARNER_TYPES: [&str; 2] = ["learner", "متعلم"];

/// Account type as reported by the backend.
///
/// Deserializes from either spelling and always serializes back to the
/// canonical English value, so a cached profile is stable across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    Admin,
    Learner,
    Other(String),
}

impl UserType {
    pub fn as_str(&self) -> &str {
        match self {
            UserType::Admin => "admin",
            UserType::Learner => "learner",
            UserType::Other(raw) => raw,
        }
    }
}

impl From<String> for UserType {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if ADMIN_TYPES.contains(&trimmed) {
            UserType::Admin
        } else if LEARNER_TYPES.contains(&trimmed) {
            UserType::Learner
        } else {
            UserType::Other(raw)
        }
    }
}

impl From<&str> for UserType {
    fn from(raw: &str) -> Self {
        UserType::from(raw.to_string())
    }
}

impl From<UserType> for String {
    fn from(user_type: UserType) -> Self {
        user_type.as_str().to_string()
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role chosen when registering a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Learner,
}

impl Role {
    /// Registration endpoint for this role, relative to the API base.
    pub fn register_path(&self) -> &'static str {
        match self {
            Role::Admin => "/account/register/admin/",
            Role::Learner => "/account/register/learner/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Learner => f.write_str("learner"),
        }
    }
}

/// Profile of the signed-in user.
///
/// Only `email` and `user_type` are interpreted by the client. Everything
/// else the server sends is kept in `extra` so it survives being cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub email: String,
    pub user_type: UserType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, user_type: UserType) -> Self {
        Self {
            id: None,
            email: email.into(),
            user_type,
            extra: Map::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_learner(&self) -> bool {
        self.user_type == UserType::Learner
    }

    /// Number of enrolled courses, present for learners only.
    pub fn enrolled_courses_count(&self) -> Option<i64> {
        self.extra.get("enrolled_courses_count").and_then(Value::as_i64)
    }

    /// Titles of enrolled courses, present for learners only.
    pub fn enrolled_courses_titles(&self) -> Vec<String> {
        self.extra
            .get("enrolled_courses_titles")
            .and_then(Value::as_array)
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Access/refresh token pair issued on login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response body of the login and registration endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserProfile,
    pub tokens: TokenPair,
}
