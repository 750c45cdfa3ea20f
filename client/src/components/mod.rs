//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session signals from [`crate::state::context`] and
//! never touch storage or the widget directly.

pub mod header;
pub mod telegram_login;
