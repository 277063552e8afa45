use super::{ApiError, TodoStore};
use crate::model::{NewTodo, Todo};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// [`TodoStore`] backed by a JSON REST API.
///
/// Endpoints, relative to the configured base URL:
///
/// | Operation | Request |
/// |-----------|---------|
/// | fetch-all | `GET /todos?userId={id}` |
/// | create    | `POST /todos` |
/// | update    | `PATCH /todos/{id}` |
/// | delete    | `DELETE /todos/{id}` |
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base: String,
}

impl HttpStore {
    /// Build a store for `base_url` with a per-request timeout.
    ///
    /// The URL is expected to be validated already (see
    /// [`crate::util::validate_base_url`]).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base)
    }

    fn todo_url(&self, id: u32) -> String {
        format!("{}/todos/{}", self.base, id)
    }
}

/// Reject non-2xx responses, then decode the body as `T`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl TodoStore for HttpStore {
    async fn fetch_all(&self, user_id: u32) -> Result<Vec<Todo>, ApiError> {
        tracing::debug!(user_id, "GET todos");
        let response = self
            .client
            .get(self.todos_url())
            .query(&[("userId", user_id)])
            .send()
            .await?;
        decode(response).await
    }

    async fn create(&self, todo: &NewTodo) -> Result<Todo, ApiError> {
        tracing::debug!(title = %todo.title, "POST todo");
        let response = self.client.post(self.todos_url()).json(todo).send().await?;
        decode(response).await
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        tracing::debug!(id = todo.id, "PATCH todo");
        let response = self
            .client
            .patch(self.todo_url(todo.id))
            .json(todo)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, id: u32) -> Result<(), ApiError> {
        tracing::debug!(id, "DELETE todo");
        let response = self.client.delete(self.todo_url(id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}
