//! Core library for learnpath.
//!
//! Provides everything a front end needs to talk to the learning platform
//! backend: the authenticated API client with its token refresh pipeline,
//! persisted credentials, the session context, route guards and the
//! course/project data models.

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;

pub use actions::{delete_course, delete_project, Confirm, Deletion};
pub use api::{ApiClient, ApiError, ApiRequest};
pub use auth::{
    AuthError, CredentialRecord, CredentialStore, FileStore, KeyValueStore, KeyringStore,
    MemoryStore, SessionContext, SessionState,
};
pub use config::{Config, StorageKind};
pub use routes::{
    GuardDecision, LogNavigator, Navigator, RecordingNavigator, Route, RouteGuard,
};
