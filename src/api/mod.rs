//! Remote store client for todos.
//!
//! The synchronization controller only depends on the [`TodoStore`] trait:
//! four independent async calls that either succeed or fail with an
//! [`ApiError`]. [`HttpStore`] is the production implementation speaking JSON
//! to a todos REST API.
//!
//! # Example
//!
//! ```ignore
//! use tend::api::{HttpStore, TodoStore};
//!
//! let store = HttpStore::new(base_url, Duration::from_secs(30))?;
//! let todos = store.fetch_all(42).await?;
//! ```

mod http;

use crate::model::{NewTodo, Todo};
use std::future::Future;
use thiserror::Error;

pub use http::HttpStore;

/// Errors returned by a [`TodoStore`].
///
/// The controller does not distinguish between these: any failure collapses
/// into the operation's failure outcome. The variants exist for logging.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Response with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(String),
    /// Failure reported by a non-HTTP store
    #[error("{0}")]
    Other(String),
}

/// The four operations of the remote todos service.
///
/// Futures must be `Send` because every call runs inside a spawned tokio task.
pub trait TodoStore: Send + Sync + 'static {
    /// Fetch every todo owned by `user_id`.
    fn fetch_all(&self, user_id: u32) -> impl Future<Output = Result<Vec<Todo>, ApiError>> + Send;

    /// Persist a new todo; the returned record carries the server-assigned id.
    fn create(&self, todo: &NewTodo) -> impl Future<Output = Result<Todo, ApiError>> + Send;

    /// Replace the record with `todo.id` by `todo`.
    fn update(&self, todo: &Todo) -> impl Future<Output = Result<Todo, ApiError>> + Send;

    /// Remove the record with `id`.
    fn delete(&self, id: u32) -> impl Future<Output = Result<(), ApiError>> + Send;
}
