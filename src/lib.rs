//! tend: a terminal todo client kept in sync with a remote todos API.
//!
//! The interesting part lives in [`sync`]: operations are applied to the
//! remote store first and reflected locally once they resolve, with
//! [`app::App`] holding everything the terminal UI renders.

pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod sync;
pub mod ui;
pub mod util;
