//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the Leptos SSR shell, the hydrate bundle under `/pkg`, and a health
//! probe. There is deliberately no identity endpoint: login payloads stay in
//! the browser.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Missing or malformed `[package.metadata.leptos]` / `LEPTOS_*` settings.
    #[error("leptos configuration: {0}")]
    LeptosConfig(String),
}

/// Build the full application router.
///
/// # Errors
///
/// Returns [`RouteError::LeptosConfig`] if the Leptos configuration cannot be
/// loaded.
pub fn app(config: &ServerConfig) -> Result<Router, RouteError> {
    let conf = get_configuration(None).map_err(|e| RouteError::LeptosConfig(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);
    let widget = config.widget.clone();

    let leptos_router = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            move || provide_context(widget.clone()),
            {
                let opts = leptos_options.clone();
                move || client::app::shell(opts.clone())
            },
        )
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(Router::new()
        .route("/healthz", get(healthz))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
