//! # client
//!
//! Leptos + WASM frontend that signs users in with the Telegram Login Widget
//! and keeps the resulting identity as a browser-local session.
//!
//! Session logic (`state::session`, `net::widget`) is plain Rust behind small
//! traits so it runs under native tests; components only read signals from
//! `state::context`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
