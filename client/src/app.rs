//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::header::Header;
use crate::net::config::WidgetConfig;
use crate::net::widget::{WidgetBridge, default_host};
use crate::pages::home::HomePage;
use crate::state::context::SessionContext;
use crate::state::session::SessionStore;
use crate::state::storage::default_storage;
use crate::util::clock::default_clock;

/// HTML shell rendered on the server for SSR + hydration.
///
/// Publishes the server-provided [`WidgetConfig`] context as `<meta>` tags so
/// the hydrated client opens the same widget.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    let config = use_context::<WidgetConfig>().unwrap_or_default();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                {config
                    .meta_tags()
                    .into_iter()
                    .map(|(name, content)| view! { <meta name=name content=content/> })
                    .collect_view()}
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store and widget bridge for this environment and
/// exposes them to the tree as a [`SessionContext`].
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = use_context::<WidgetConfig>().unwrap_or_else(WidgetConfig::from_page);
    let store = SessionStore::load(default_storage(), default_clock());
    let bridge = WidgetBridge::with_listener(default_host(), store, config, |record| {
        leptos::logging::log!("telegram login accepted for user {}", record.id);
    });
    SessionContext::install(bridge);

    view! {
        <Stylesheet id="leptos" href="/pkg/tglogin.css"/>
        <Title text="Telegram Login"/>

        <Router>
            <Header/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
