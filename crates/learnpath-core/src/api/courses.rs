//! Course endpoints.

use crate::models::{Course, CourseInput, Enrollment, Envelope};

use super::{ApiClient, ApiError, ApiRequest};

impl ApiClient {
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let mut envelope = self.send_envelope(ApiRequest::get("/courses/")).await?;
        envelope.take_or_default("courses")
    }

    pub async fn course(&self, id: i64) -> Result<Course, ApiError> {
        let mut envelope = self.send_envelope(ApiRequest::get(format!("/courses/{}/", id))).await?;
        envelope.take("course")
    }

    /// Course with enrollment state and its projects.
    pub async fn course_details(&self, id: i64) -> Result<Course, ApiError> {
        let mut envelope = self
            .send_envelope(ApiRequest::get(format!("/courses/{}/details/", id)))
            .await?;
        envelope.take("course")
    }

    pub async fn create_course(&self, input: &CourseInput) -> Result<Course, ApiError> {
        let request = ApiRequest::post("/courses/create/").json(input)?;
        let mut envelope = self.send_envelope(request).await?;
        envelope.take("course")
    }

    pub async fn update_course(&self, id: i64, input: &CourseInput) -> Result<Envelope, ApiError> {
        let request = ApiRequest::put(format!("/courses/{}/update/", id)).json(input)?;
        self.send_envelope(request).await
    }

    /// Delete a course. Callers are expected to have confirmed with the
    /// user first; see `actions::delete_course`.
    pub async fn delete_course(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::delete(format!("/courses/{}/delete/", id)))
            .await
    }

    /// Summary the server shows before a course is deleted.
    pub async fn confirm_delete_course(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::get(format!("/courses/{}/confirm-delete/", id)))
            .await
    }

    pub async fn join_course(&self, id: i64) -> Result<Envelope, ApiError> {
        self.send_envelope(ApiRequest::post(format!("/courses/{}/join/", id)))
            .await
    }

    pub async fn check_enrollment(&self, id: i64) -> Result<Enrollment, ApiError> {
        self.send_json(ApiRequest::get(format!("/courses/{}/check-enrollment/", id)))
            .await
    }

    /// Courses the signed-in learner has joined.
    pub async fn my_courses(&self) -> Result<Vec<Course>, ApiError> {
        let mut envelope = self.send_envelope(ApiRequest::get("/courses/my-courses/")).await?;
        envelope.take_or_default("courses")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::CredentialStore;
    use crate::routes::LogNavigator;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), CredentialStore::in_memory(), Arc::new(LogNavigator)).unwrap()
    }

    #[tokio::test]
    async fn test_list_courses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/courses/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "count": 2,
                "courses": [
                    {"id": 1, "title": "Rust", "description": "Systems"},
                    {"id": 2, "title": "Go", "description": "Services"}
                ]
            })))
            .mount(&server)
            .await;

        let courses = client_for(&server).list_courses().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].title, "Go");
    }

    #[tokio::test]
    async fn test_create_course_sends_input() {
        let server = MockServer::start().await;
        let input = CourseInput {
            title: "Data 101".to_string(),
            description: "An introduction to working with data sets.".to_string(),
            level: "beginner".to_string(),
            category: "data".to_string(),
            estimated_duration: 20,
            is_public: true,
        };
        Mock::given(method("POST"))
            .and(path("/courses/create/"))
            .and(body_json(serde_json::to_value(&input).unwrap()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "course": {"id": 9, "title": "Data 101", "level": "مبتدئ", "is_public": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let course = client_for(&server).create_course(&input).await.unwrap();
        assert_eq!(course.id, Some(9));
    }

    #[tokio::test]
    async fn test_create_course_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courses/create/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "failed to create course",
                "errors": ["title: too short"]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_course(&CourseInput::default())
            .await
            .unwrap_err();
        let body = err.error_body().expect("validation body");
        assert_eq!(body.field("errors"), Some("title: too short"));
    }

    #[tokio::test]
    async fn test_check_enrollment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/courses/4/check-enrollment/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "is_enrolled": true,
                "course": {"id": 4, "title": "Rust", "is_public": true, "enrolled_learners_count": 3}
            })))
            .mount(&server)
            .await;

        let enrollment = client_for(&server).check_enrollment(4).await.unwrap();
        assert!(enrollment.is_enrolled);
    }

    #[tokio::test]
    async fn test_join_course() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courses/4/join/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "message": "joined"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server).join_course(4).await.unwrap();
        assert_eq!(envelope.message.as_deref(), Some("joined"));
    }
}
