//! Learner dashboard, progress and admin overview models.
//!
//! Only the summary numbers are typed; the remaining dashboard sections are
//! free-form and kept as JSON for display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Course, Project, UserProfile};

/// Items shown in the admin overview's recent lists
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerDashboard {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub dashboard_stats: DashboardStats,
    #[serde(default)]
    pub enrolled_projects: Value,
    #[serde(default)]
    pub learning_progress: Value,
    #[serde(default)]
    pub notifications: Value,
    #[serde(default)]
    pub recent_activity: Value,
    #[serde(default)]
    pub suggested_projects: Value,
    #[serde(default)]
    pub quick_actions: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_enrolled_projects: i64,
    #[serde(default)]
    pub completed_projects: i64,
    #[serde(default)]
    pub in_progress_projects: i64,
    #[serde(default)]
    pub total_hours_spent: i64,
    #[serde(default)]
    pub current_streak_days: i64,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub avg_project_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProgress {
    #[serde(default)]
    pub message: Option<String>,
    pub progress_data: ProgressData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressData {
    pub overall: ProgressOverview,
    /// Skill name to accumulated points.
    #[serde(default)]
    pub skill_development: Map<String, Value>,
    #[serde(default)]
    pub timeline: Vec<Value>,
    #[serde(default)]
    pub achievements: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressOverview {
    #[serde(default)]
    pub enrollment_date: Option<String>,
    #[serde(default)]
    pub days_active: i64,
    #[serde(default)]
    pub total_projects_enrolled: i64,
    #[serde(default)]
    pub total_hours_estimated: i64,
}

/// Admin landing view, computed from the full course and project lists.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_courses: usize,
    pub total_projects: usize,
    /// Sum of enrolled learners over all courses
    pub total_learners: i64,
    pub active_courses: usize,
    /// First entries in server order, newest first
    pub recent_courses: Vec<Course>,
    pub recent_projects: Vec<Project>,
}

impl AdminOverview {
    pub fn from_lists(courses: Vec<Course>, projects: Vec<Project>) -> Self {
        let total_learners = courses
            .iter()
            .map(|c| c.enrolled_students_count.unwrap_or(0))
            .sum();
        let active_courses = courses.iter().filter(|c| c.is_active == Some(true)).count();

        Self {
            total_courses: courses.len(),
            total_projects: projects.len(),
            total_learners,
            active_courses,
            recent_courses: courses.into_iter().take(RECENT_LIMIT).collect(),
            recent_projects: projects.into_iter().take(RECENT_LIMIT).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_stats() {
        let json = r#"{
            "message": "Learner dashboard",
            "dashboard_stats": {
                "total_enrolled_projects": 4,
                "completed_projects": 2,
                "in_progress_projects": 2,
                "total_hours_spent": 40,
                "current_streak_days": 7,
                "skill_level": "متوسط",
                "completion_rate": 50,
                "avg_project_score": 85
            },
            "enrolled_projects": {"count": 0, "projects": []}
        }"#;
        let dashboard: LearnerDashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.dashboard_stats.total_enrolled_projects, 4);
        assert_eq!(dashboard.dashboard_stats.completion_rate, 50.0);
        assert!(dashboard.user_profile.is_none());
        assert!(dashboard.notifications.is_null());
    }

    #[test]
    fn test_parse_progress() {
        let json = r#"{
            "message": "progress",
            "progress_data": {
                "overall": {"enrollment_date": "2025-01-10", "days_active": 30, "total_projects_enrolled": 2, "total_hours_estimated": 40},
                "skill_development": {"تطوير الويب": 20},
                "timeline": [{"date": "2025-01", "event": "joined"}],
                "achievements": []
            }
        }"#;
        let progress: LearnerProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.progress_data.overall.days_active, 30);
        assert_eq!(progress.progress_data.skill_development.len(), 1);
    }

    #[test]
    fn test_admin_overview_from_empty_lists() {
        let overview = AdminOverview::from_lists(Vec::new(), Vec::new());
        assert_eq!(overview.total_courses, 0);
        assert_eq!(overview.total_learners, 0);
        assert!(overview.recent_courses.is_empty());
    }
}
