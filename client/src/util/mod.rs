//! Environment and display helpers for the client.
//!
//! `clock` hides the native/browser time split; `format` holds pure view
//! helpers that components call.

pub mod clock;
pub mod format;
