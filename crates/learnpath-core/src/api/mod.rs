//! REST API client module for the learning platform backend.
//!
//! This module provides the `ApiClient` and its request pipeline, plus
//! typed endpoint wrappers grouped by backend app:
//!
//! - `account`: login, registration, logout, profile, learner dashboard
//! - `courses`: course CRUD, enrollment
//! - `projects`: project CRUD, starting a project
//!
//! The API uses JWT bearer tokens. A rejected access token is refreshed
//! once per request using the stored refresh token.

pub mod account;
pub mod client;
pub mod courses;
pub mod error;
pub mod projects;

pub use client::{ApiClient, ApiRequest, RefreshState, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorBody};
