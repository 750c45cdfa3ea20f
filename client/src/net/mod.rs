//! Browser-facing integrations.
//!
//! `widget` holds the login state machine and the host trait; `widget_host`
//! implements that trait with `web-sys` for the hydrated build.

pub mod config;
pub mod widget;
#[cfg(feature = "hydrate")]
pub mod widget_host;
