//! Account endpoints: authentication, profile and dashboards.

use futures::try_join;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::{
    AdminOverview, AuthPayload, LearnerDashboard, LearnerProgress, Role, UserProfile,
};

use super::{ApiClient, ApiError, ApiRequest};

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    password2: &'a str,
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let request = ApiRequest::post("/account/login/").json(&LoginBody { email, password })?;
        self.send_json(request).await
    }

    /// Register a new account; `role` selects the admin or learner endpoint.
    pub async fn register(
        &self,
        role: Role,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<AuthPayload, ApiError> {
        let request = ApiRequest::post(role.register_path()).json(&RegisterBody {
            email,
            password,
            password2: password_confirmation,
        })?;
        self.send_json(request).await
    }

    /// Blacklist the refresh token on the server.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::post("/account/logout/").json(&json!({ "refresh_token": refresh_token }))?;
        self.send(request).await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let mut envelope = self.send_envelope(ApiRequest::get("/account/profile/")).await?;
        envelope.take("user")
    }

    /// Partially update the profile. Returns the profile as saved.
    pub async fn update_profile(&self, changes: &Map<String, Value>) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::patch("/account/profile/").json(changes)?;
        let mut envelope = self.send_envelope(request).await?;
        envelope.take("user")
    }

    pub async fn learner_dashboard(&self) -> Result<LearnerDashboard, ApiError> {
        self.send_json(ApiRequest::get("/account/learner/dashboard/")).await
    }

    pub async fn learner_progress(&self) -> Result<LearnerProgress, ApiError> {
        self.send_json(ApiRequest::get("/account/learner/progress/")).await
    }

    /// Admin dashboard. There is no dedicated endpoint; all courses and
    /// projects are fetched concurrently and summarized.
    pub async fn admin_overview(&self) -> Result<AdminOverview, ApiError> {
        let (courses, projects) = try_join!(self.list_courses(), self.list_projects(None))?;
        Ok(AdminOverview::from_lists(courses, projects))
    }
}
