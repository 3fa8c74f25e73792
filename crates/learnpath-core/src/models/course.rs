//! Course models and enrollment state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp::deserialize_timestamp;

/// A course ("learning path") as returned by list and detail endpoints.
///
/// The list, detail and create endpoints return overlapping field sets, so
/// everything beyond the identity fields is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Course {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub level_display: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_display: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<i64>,
    #[serde(default)]
    pub projects_count: Option<i64>,
    #[serde(default)]
    pub actual_projects_count: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub enrolled_students_count: Option<i64>,

    // Detail endpoint only
    #[serde(default)]
    pub is_enrolled: Option<bool>,
    #[serde(default)]
    pub can_join: Option<bool>,
    #[serde(default)]
    pub course_projects: Vec<Value>,
}

impl Course {
    /// Level for display, preferring the server's localized label.
    pub fn level_label(&self) -> &str {
        self.level_display
            .as_deref()
            .or(self.level.as_deref())
            .unwrap_or("-")
    }

    pub fn category_label(&self) -> &str {
        self.category_display
            .as_deref()
            .or(self.category.as_deref())
            .unwrap_or("-")
    }

    /// Project count, preferring the server-computed actual count.
    pub fn project_count(&self) -> i64 {
        self.actual_projects_count
            .or(self.projects_count)
            .unwrap_or(0)
    }
}

/// Writable course fields for create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    pub level: String,
    pub category: String,
    pub estimated_duration: i64,
    #[serde(default)]
    pub is_public: bool,
}

/// Result of the enrollment check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Enrollment {
    pub is_enrolled: bool,
    #[serde(default)]
    pub course: Option<EnrollmentCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct EnrollmentCourse {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub enrolled_learners_count: Option<i64>,
}
