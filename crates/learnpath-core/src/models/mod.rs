//! Data models for learning platform entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `UserProfile`, `UserType`, `Role`: Accounts and their roles
//! - `AuthPayload`, `TokenPair`: Login/registration responses
//! - `Course`, `CourseInput`, `Enrollment`: Courses and enrollment state
//! - `Project`, `ProjectInput`: Projects belonging to courses
//! - `LearnerDashboard`, `LearnerProgress`: Learner dashboard data
//! - `AdminOverview`: Admin dashboard totals and recent items
//! - `Envelope`: The generic `{success, message, errors, ...}` wrapper

pub mod course;
pub mod dashboard;
pub mod envelope;
pub mod project;
pub mod timestamp;
pub mod user;

pub use course::{Course, CourseInput, Enrollment, EnrollmentCourse};
pub use dashboard::{
    AdminOverview, DashboardStats, LearnerDashboard, LearnerProgress, ProgressData,
    ProgressOverview,
};
pub use envelope::Envelope;
pub use project::{Project, ProjectInput};
pub use user::{AuthPayload, Role, TokenPair, UserProfile, UserType};
