//! Small helpers shared by the controller and the terminal UI.
//!
//! - **Base URL validation**: the remote store must be reached over HTTPS
//! - **Task panics**: converting a panicking remote call into a failed one
//! - **Text**: display-width aware fitting of todo titles into a row

mod task;
mod text;
mod url;

pub use task::catch_task_panic;
pub use text::{display_title, fit_width, tail_width};
pub use url::{validate_base_url, UrlError};
