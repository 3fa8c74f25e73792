use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, ErrorBody};
use crate::models::{AuthPayload, Role, UserProfile};
use crate::routes::{Navigator, Route};

use super::CredentialRecord;

/// Minimum password length accepted at registration
const MIN_PASSWORD_LENGTH: usize = 8;

const LOGIN_FAILED: &str = "An error occurred while logging in";
const REGISTER_FAILED: &str = "An error occurred while registering";

#[derive(Error, Debug)]
pub enum AuthError {
    /// The server refused; carries the message to show the user.
    #[error("{0}")]
    Rejected(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Failed to save credentials: {0}")]
    Storage(String),
}

impl AuthError {
    fn rejected(err: &ApiError, fallback: &str) -> Self {
        let message = err
            .error_body()
            .and_then(ErrorBody::auth_message)
            .unwrap_or(fallback);
        AuthError::Rejected(message.to_string())
    }
}

/// Snapshot of who is signed in.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    /// True until stored credentials have been read at startup.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(UserProfile::is_admin).unwrap_or(false)
    }

    pub fn is_learner(&self) -> bool {
        self.user.as_ref().map(UserProfile::is_learner).unwrap_or(false)
    }

    /// Landing view for the signed-in user.
    pub fn home_route(&self) -> Route {
        if self.is_admin() {
            Route::AdminDashboard
        } else {
            Route::Dashboard
        }
    }
}

/// Check registration passwords before anything is sent.
pub fn validate_passwords(password: &str, confirmation: &str) -> Result<(), AuthError> {
    if password != confirmation {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// The application's view of the signed-in user.
///
/// State changes are published on a watch channel so front ends can
/// re-render when the session changes.
pub struct SessionContext {
    client: ApiClient,
    state: Arc<watch::Sender<SessionState>>,
}

/// Forwards redirects to the front end, signing the session out first when
/// the client gives up on the stored credentials.
struct SessionNavigator {
    inner: Arc<dyn Navigator>,
    state: Arc<watch::Sender<SessionState>>,
}

impl Navigator for SessionNavigator {
    fn redirect(&self, route: Route) {
        if route == Route::Login {
            self.state.send_if_modified(|state| {
                if state.user.is_none() {
                    return false;
                }
                debug!("Credentials dropped by the client, signing out");
                state.user = None;
                true
            });
        }
        self.inner.redirect(route);
    }
}

impl SessionContext {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let state = Arc::new(state);
        let navigator = Arc::new(SessionNavigator {
            inner: client.navigator(),
            state: state.clone(),
        });
        let client = client.with_navigator(navigator);
        Self { client, state }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    pub fn is_learner(&self) -> bool {
        self.state.borrow().is_learner()
    }

    /// Read stored credentials once at startup. Later calls do nothing.
    pub fn initialize(&self) {
        if !self.state.borrow().loading {
            return;
        }

        let user = self.client.credentials().load().map(|record| record.user);
        debug!(authenticated = user.is_some(), "Session initialized");
        self.state.send_replace(SessionState {
            user,
            loading: false,
        });
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, AuthError> {
        match self.client.login(email, password).await {
            Ok(payload) => {
                self.establish(&payload)?;
                info!(email, "Login successful");
                Ok(payload)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(AuthError::rejected(&e, LOGIN_FAILED))
            }
        }
    }

    /// Register a new account and sign in as it.
    ///
    /// Mismatched or short passwords are rejected locally, without a request.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        password_confirmation: &str,
        role: Role,
    ) -> Result<AuthPayload, AuthError> {
        validate_passwords(password, password_confirmation)?;

        match self
            .client
            .register(role, email, password, password_confirmation)
            .await
        {
            Ok(payload) => {
                self.establish(&payload)?;
                info!(email, %role, "Registration successful");
                Ok(payload)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                Err(AuthError::rejected(&e, REGISTER_FAILED))
            }
        }
    }

    /// End the session. The server call is best effort; local credentials
    /// are always cleared.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.client.credentials().refresh_token() {
            if let Err(e) = self.client.logout(&refresh_token).await {
                warn!(error = %e, "Logout request failed");
            }
        }

        self.client.credentials().clear();
        self.state.send_modify(|state| state.user = None);
        info!("Logged out");
    }

    /// Replace the cached profile. Does not contact the server.
    pub fn update_user(&self, user: UserProfile) {
        if let Err(e) = self.client.credentials().save_user(&user) {
            warn!(error = %e, "Failed to store updated profile");
        }
        self.state.send_modify(|state| state.user = Some(user));
    }

    /// Fetch the profile from the server and cache it.
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let profile = self.client.profile().await?;
        self.update_user(profile.clone());
        Ok(profile)
    }

    /// Save profile changes on the server, then cache the result.
    pub async fn update_profile(&self, changes: &Map<String, Value>) -> Result<UserProfile, ApiError> {
        let profile = self.client.update_profile(changes).await?;
        self.update_user(profile.clone());
        Ok(profile)
    }

    /// Drop the user if the stored credentials were wiped underneath us,
    /// e.g. by a failed token refresh.
    pub fn revalidate(&self) {
        if self.client.credentials().access_token().is_none() && self.is_authenticated() {
            debug!("Stored credentials gone, signing out locally");
            self.state.send_modify(|state| state.user = None);
        }
    }

    fn establish(&self, payload: &AuthPayload) -> Result<(), AuthError> {
        let record = CredentialRecord {
            access_token: payload.tokens.access.clone(),
            refresh_token: Some(payload.tokens.refresh.clone()),
            user: payload.user.clone(),
        };
        self.client
            .credentials()
            .save(&record)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        self.state.send_modify(|state| state.user = Some(record.user));
        Ok(())
    }
}
