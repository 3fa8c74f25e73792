//! Project models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::deserialize_timestamp;

/// A project belonging to a course.
///
/// List and detail endpoints identify the project as `project_id`, the
/// start endpoint as `id`; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Project {
    #[serde(alias = "project_id")]
    pub id: i64,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub course_title: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub resources: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<i64>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub level_display: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub language_display: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub total_course_projects: Option<i64>,
}

impl Project {
    pub fn level_label(&self) -> &str {
        self.level_display
            .as_deref()
            .or(self.level.as_deref())
            .unwrap_or("-")
    }

    pub fn language_label(&self) -> &str {
        self.language_display
            .as_deref()
            .or(self.language.as_deref())
            .unwrap_or("-")
    }
}

/// Writable project fields. `course_id` is only sent on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ProjectInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub resources: String,
    pub estimated_time: i64,
    pub level: String,
    pub language: String,
    #[serde(default)]
    pub order: i64,
}
