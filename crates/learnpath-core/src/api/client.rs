//! API client for the learning platform REST backend.
//!
//! Every call goes through `ApiClient::send`, which attaches the stored
//! access token and, when the backend answers 401, refreshes the token once
//! and replays the request. If the refresh fails the stored credentials are
//! wiped and the navigator is sent to the login view.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::CredentialStore;
use crate::models::Envelope;
use crate::routes::{Navigator, Route};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Backend address used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token refresh endpoint, relative to the base URL
const REFRESH_PATH: &str = "/account/token/refresh/";

/// Replays allowed per request after a successful refresh
const MAX_REPLAYS: u32 = 1;

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the backend rotates refresh tokens
    #[serde(default)]
    refresh: Option<String>,
}

/// Where the refresh pipeline is for the request being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Normal,
    Refreshing,
    Failed,
}

/// A request on its way through the pipeline.
///
/// `attempts` counts replays; a request that has already been replayed is
/// never refreshed again.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    attempts: u32,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            attempts: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_retried(&self) -> bool {
        self.attempts >= MAX_REPLAYS
    }

    fn mark_retried(&mut self) {
        self.attempts += 1;
    }
}

/// API client for the learning platform.
/// Clone is cheap - reqwest::Client, the credential store and the navigator
/// are all shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(
        base_url: &str,
        credentials: CredentialStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        self.navigator.clone()
    }

    /// Same client, connection pool and store, reporting redirects to
    /// `navigator` instead.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer header for the stored access token, if any.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.credentials.access_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored access token is not a valid header value, sending without it"),
            }
        }
        headers
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let url = self.url(&request.path);
        debug!(method = %request.method, url = %url, attempt = request.attempts, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(self.auth_headers());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request through the token pipeline.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Response, ApiError> {
        let response = self.dispatch(&request).await?;

        if response.status() != StatusCode::UNAUTHORIZED || request.is_retried() {
            return Self::check_response(response).await;
        }

        request.mark_retried();
        self.refresh_session().await?;

        // dispatch re-reads the store, so the new token is attached
        let response = self.dispatch(&request).await?;
        Self::check_response(response).await
    }

    /// Send a request and decode the JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        let text = response.text().await?;
        // Some endpoints answer with an empty body (e.g. 205 on logout)
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    /// Send a request and decode the `{success, message, ...}` envelope.
    /// An explicit `success: false` becomes `ApiError::Rejected`.
    pub async fn send_envelope(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        self.send_json::<Envelope>(request).await?.into_result()
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// On failure all credentials are cleared and the navigator is sent to
    /// the login view before the error is returned.
    async fn refresh_session(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.credentials.refresh_token() else {
            self.log_state(RefreshState::Failed);
            warn!("Access token rejected and no refresh token stored");
            self.fail_session();
            return Err(ApiError::Unauthorized);
        };

        self.log_state(RefreshState::Refreshing);
        match self.request_refresh(&refresh_token).await {
            Ok(()) => {
                self.log_state(RefreshState::Normal);
                Ok(())
            }
            Err(e) => {
                self.log_state(RefreshState::Failed);
                warn!(error = %e, "Token refresh failed, ending session");
                self.fail_session();
                Err(e)
            }
        }
    }

    /// The refresh call bypasses the pipeline: no bearer header, no retry.
    async fn request_refresh(&self, refresh_token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let tokens: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse refresh response: {}", e)))?;

        self.credentials
            .set_access_token(&tokens.access)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        if let Some(ref refresh) = tokens.refresh {
            self.credentials
                .set_refresh_token(refresh)
                .map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        info!("Access token refreshed");
        Ok(())
    }

    fn fail_session(&self) {
        self.credentials.clear();
        self.navigator.redirect(Route::Login);
    }

    fn log_state(&self, state: RefreshState) {
        debug!(?state, "Refresh pipeline state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialRecord;
    use crate::models::{UserProfile, UserType};
    use crate::routes::RecordingNavigator;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn record(access: &str, refresh: Option<&str>) -> CredentialRecord {
        CredentialRecord {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            user: UserProfile::new("learner@example.com", UserType::Learner),
        }
    }

    fn client_for(server: &MockServer) -> (ApiClient, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::new(
            &server.uri(),
            CredentialStore::in_memory(),
            navigator.clone(),
        )
        .unwrap();
        (client, navigator)
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_content_type() {
        let server = MockServer::start().await;
        let (client, _) = client_for(&server);
        client.credentials().save(&record("tok-1", Some("ref-1"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/"))
            .and(header("authorization", "Bearer tok-1"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courses": []})))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client.send_envelope(ApiRequest::get("/courses/")).await.unwrap();
        assert!(envelope.is_success());
    }

    #[tokio::test]
    async fn test_no_token_no_authorization_header() {
        let server = MockServer::start().await;
        let (client, _) = client_for(&server);

        Mock::given(method("GET"))
            .and(path("/courses/"))
            .and(|req: &Request| !req.headers.contains_key("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courses": []})))
            .expect(1)
            .mount(&server)
            .await;

        client.send(ApiRequest::get("/courses/")).await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_once_and_replays() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("old", Some("ref-1"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/my-courses/"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .and(body_json(json!({"refresh": "ref-1"})))
            .and(|req: &Request| !req.headers.contains_key("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/courses/my-courses/"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"courses": []})))
            .expect(1)
            .mount(&server)
            .await;

        client.send(ApiRequest::get("/courses/my-courses/")).await.unwrap();

        assert_eq!(client.credentials().access_token().as_deref(), Some("new"));
        assert_eq!(client.credentials().refresh_token().as_deref(), Some("ref-1"));
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_stored() {
        let server = MockServer::start().await;
        let (client, _) = client_for(&server);
        client.credentials().save(&record("old", Some("ref-1"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/account/profile/"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access": "new", "refresh": "ref-2"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/account/profile/"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        client.send(ApiRequest::get("/account/profile/")).await.unwrap();
        assert_eq!(client.credentials().refresh_token().as_deref(), Some("ref-2"));
    }

    #[tokio::test]
    async fn test_replayed_request_is_not_refreshed_again() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("old", Some("ref-1"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.send(ApiRequest::get("/courses/")).await.unwrap_err();
        assert!(err.is_unauthorized());
        // The replay's 401 passes through untouched
        assert_eq!(client.credentials().access_token().as_deref(), Some("new"));
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_credentials_and_redirects() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("old", Some("expired"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Token is invalid or expired",
                "code": "token_not_valid"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.send(ApiRequest::get("/courses/")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(client.credentials().access_token().is_none());
        assert!(client.credentials().refresh_token().is_none());
        assert!(client.credentials().load().is_none());
        assert_eq!(navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_refresh_server_error_is_propagated() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("old", Some("ref-1"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/projects/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.send(ApiRequest::get("/projects/")).await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(_)));
        assert!(client.credentials().load().is_none());
        assert_eq!(navigator.history(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_refresh_call() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("old", None)).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client.send(ApiRequest::get("/courses/")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(client.credentials().load().is_none());
        assert_eq!(navigator.last(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let server = MockServer::start().await;
        let (client, navigator) = client_for(&server);
        client.credentials().save(&record("tok", Some("ref"))).unwrap();

        Mock::given(method("GET"))
            .and(path("/courses/99/"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"success": false, "message": "course not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/account/token/refresh/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client.send(ApiRequest::get("/courses/99/")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "course not found"));
        assert_eq!(client.credentials().access_token().as_deref(), Some("tok"));
        assert!(navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_envelope_failure_is_rejected() {
        let server = MockServer::start().await;
        let (client, _) = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/courses/3/join/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "message": "already enrolled"})),
            )
            .mount(&server)
            .await;

        let err = client.send_envelope(ApiRequest::post("/courses/3/join/")).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref msg) if msg == "already enrolled"));
    }

    #[test]
    fn test_request_descriptor() {
        let mut request = ApiRequest::get("/projects/").query("course_id", 4);
        assert_eq!(request.path(), "/projects/");
        assert_eq!(request.method(), &Method::GET);
        assert!(!request.is_retried());
        request.mark_retried();
        assert_eq!(request.attempts(), 1);
        assert!(request.is_retried());
    }
}
