//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` owns the single identity record, `storage` persists it, and
//! `observer` fans changes out. `context` mirrors all of it into Leptos
//! signals for components.

pub mod context;
pub mod observer;
pub mod session;
pub mod storage;
