//! The synchronization controller.
//!
//! Keeps [`crate::app::App`] consistent with the remote store:
//!
//! - [`Dispatcher`] issues operations: it records in-flight state and spawns
//!   the remote call
//! - [`handle_app_event`] applies each resolved call back onto the session
//!
//! Both halves run on the event loop's thread. The only concurrency is between
//! pending remote calls, so no two mutations of the session ever interleave.
//!
//! # Example
//!
//! ```ignore
//! let (event_tx, mut event_rx) = mpsc::channel(32);
//! let dispatcher = Dispatcher::new(Arc::new(store), event_tx);
//!
//! dispatcher.load(&mut app);
//! while let Some(event) = event_rx.recv().await {
//!     handle_app_event(&mut app, event);
//! }
//! ```

mod dispatch;
mod events;

pub use dispatch::Dispatcher;
pub use events::handle_app_event;
