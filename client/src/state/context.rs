//! Reactive session context shared with components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read signals; the session store and widget bridge remain plain
//! Rust objects. Subscriptions installed here copy store and bridge updates
//! into those signals, so the Leptos layer never owns session logic.
//!
//! HYDRATION
//! =========
//! The server renders without `localStorage`, so the signals start logged out
//! and `Idle` in every build. They pick up the stored session in an effect,
//! which only runs in the browser once the SSR markup has been hydrated.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use identity::IdentityRecord;
use leptos::prelude::*;

use crate::net::widget::{BridgePhase, WidgetBridge};
#[cfg(feature = "hydrate")]
use crate::state::session::SessionStore;

/// Session signals plus a handle to the bridge that drives them.
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// Current freshness-checked identity, `None` when logged out or stale.
    pub user: RwSignal<Option<IdentityRecord>>,
    /// Login flow phase, used to disable the button while the script loads.
    pub phase: RwSignal<BridgePhase>,
    bridge: StoredValue<WidgetBridge, LocalStorage>,
}

impl SessionContext {
    /// Wrap `bridge` with signals in their pre-hydration state.
    pub fn new(bridge: WidgetBridge) -> Self {
        Self {
            user: RwSignal::new(None),
            phase: RwSignal::new(BridgePhase::Idle),
            bridge: StoredValue::new_local(bridge),
        }
    }

    /// Provide the context and start syncing it after hydration.
    pub fn install(bridge: WidgetBridge) -> Self {
        let ctx = Self::new(bridge);
        provide_context(ctx);
        Effect::new(move || ctx.sync());
        ctx
    }

    /// Mirror the store and bridge phase into the signals from now on.
    pub fn sync(&self) {
        let (user, phase) = (self.user, self.phase);
        self.bridge.with_value(|bridge| {
            bridge.store().subscribe(move |record| user.set(record.clone())).detach();
            bridge.subscribe_phase(move |next| phase.set(*next)).detach();
            #[cfg(feature = "hydrate")]
            reload_on_storage_events(bridge.store().clone());
        });
    }

    /// Start the widget login after letting the current event settle.
    pub fn start_login(&self) {
        let bridge = self.bridge;
        #[cfg(feature = "hydrate")]
        {
            gloo_timers::callback::Timeout::new(0, move || bridge.with_value(WidgetBridge::start_login)).forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            bridge.with_value(WidgetBridge::start_login);
        }
    }

    pub fn logout(&self) {
        self.bridge.with_value(WidgetBridge::logout);
    }

    /// Current Unix time from the session store's clock.
    pub fn now_secs(&self) -> i64 {
        self.bridge.with_value(|bridge| bridge.store().now_secs())
    }
}

/// Re-read the session when another tab writes `localStorage`.
#[cfg(feature = "hydrate")]
fn reload_on_storage_events(store: SessionStore) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    let on_storage = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| store.reload());
    if let Err(e) = window.add_event_listener_with_callback("storage", on_storage.as_ref().unchecked_ref()) {
        leptos::logging::warn!("cross-tab session sync unavailable: {e:?}");
    }
    on_storage.forget();
}
