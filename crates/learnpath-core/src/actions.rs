//! User actions that need a confirmation step before they touch the server.

use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::routes::Route;

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Outcome of a confirmed delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Cancelled,
    /// Deleted; the front end should move to `redirect`.
    Deleted { redirect: Route },
}

const DELETE_COURSE_PROMPT: &str = "Are you sure you want to delete this course?";
const DELETE_PROJECT_PROMPT: &str = "Are you sure you want to delete this project?";

pub async fn delete_course(
    client: &ApiClient,
    id: i64,
    confirm: &dyn Confirm,
) -> Result<Deletion, ApiError> {
    if !confirm.confirm(DELETE_COURSE_PROMPT) {
        return Ok(Deletion::Cancelled);
    }
    client.delete_course(id).await?;
    info!(course_id = id, "Course deleted");
    Ok(Deletion::Deleted {
        redirect: Route::Courses,
    })
}

pub async fn delete_project(
    client: &ApiClient,
    id: i64,
    confirm: &dyn Confirm,
) -> Result<Deletion, ApiError> {
    if !confirm.confirm(DELETE_PROJECT_PROMPT) {
        return Ok(Deletion::Cancelled);
    }
    client.delete_project(id).await?;
    info!(project_id = id, "Project deleted");
    Ok(Deletion::Deleted {
        redirect: Route::Projects,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::CredentialStore;
    use crate::routes::LogNavigator;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), CredentialStore::in_memory(), Arc::new(LogNavigator)).unwrap()
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let decline = |_: &str| false;
        assert_eq!(delete_course(&client, 1, &decline).await.unwrap(), Deletion::Cancelled);
        assert_eq!(delete_project(&client, 1, &decline).await.unwrap(), Deletion::Cancelled);
    }

    #[tokio::test]
    async fn test_confirmed_course_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/courses/7/delete/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "deleted"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let accept = |prompt: &str| prompt.contains("course");
        let outcome = delete_course(&client, 7, &accept).await.unwrap();
        assert_eq!(
            outcome,
            Deletion::Deleted {
                redirect: Route::Courses
            }
        );
    }

    #[tokio::test]
    async fn test_confirmed_project_delete_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/3/delete/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let err = delete_project(&client, 3, &|_: &str| true).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
