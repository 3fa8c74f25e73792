//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `CredentialStore`: Persisted access/refresh tokens and cached profile,
//!   backed by a file, the OS keyring, or memory
//! - `SessionContext`: The signed-in user, derived from stored credentials
//!   and updated by login, registration, logout and profile changes

pub mod credentials;
pub mod session;

pub use credentials::{
    CredentialRecord, CredentialStore, FileStore, KeyValueStore, KeyringStore, MemoryStore,
};
pub use session::{AuthError, SessionContext, SessionState};
