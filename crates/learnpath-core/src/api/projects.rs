//! Project endpoints.

use crate::models::{Envelope, Project, ProjectInput};

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    /// List projects, optionally only those of one course.
    pub async fn list_projects(&self, course_id: Option<i64>) -> Result<Vec<Project>, ApiError> {
        let mut request = ApiRequest::get("/projects/");
        if let Some(id) = course_id {
            request = request.query("course_id", id);
        }
        let mut envelope = self.send_envelope(request).await?;
        envelope.take_or_default("projects")
    }

    pub async fn project(&self, id: i64) -> Result<Project, ApiError> {
        let mut envelope = self.send_envelope(ApiRequest::get(format!("/projects/{}/", id))).await?;
        envelope.take("project")
    }

    /// Projects of a course through the per-course endpoint.
    pub async fn course_projects(&self, course_id: i64) -> Result<Vec<Project>, ApiError> {
        let mut envelope = self
            .send_envelope(ApiRequest::get(format!("/projects/course/{}/", course_id)))
            .await?;
        envelope.take_or_default("projects")
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        let request = ApiRequest::post("/projects/create/").json(input)?;
        let mut envelope = self.send_envelope(request).await?;
        envelope.take("project")
    }

    pub async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<Project, ApiError> {
        let request = ApiRequest::put(format!("/projects/{}/update/", id)).json(input)?;
        let mut envelope = self.send_envelope(request).await?;
        envelope.take("project")
    }

    /// Delete a project. See `actions::delete_project` for the confirmed
    /// variant.
    pub async fn delete_project(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::delete(format!("/projects/{}/delete/", id)))
            .await
    }

    pub async fn confirm_delete_project(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::get(format!("/projects/{}/confirm-delete/", id)))
            .await
    }

    /// Start a project as the signed-in learner.
    pub async fn start_project(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::post(format!("/projects/{}/start/", id)))
            .await
    }
}
