//! Bridge between the Telegram Login Widget and the session store.
//!
//! ARCHITECTURE
//! ============
//! The browser surface (script tag, `Telegram.Login.auth`, iframe cleanup)
//! sits behind [`WidgetHost`], and the auth callback is a closure handed to
//! the host instead of a global hook. That keeps the bridge's state machine
//! testable without a DOM.
//!
//! ```text
//! Idle -> ScriptLoading -> WidgetReady -> Authenticated
//!   ^                                         |
//!   +---------------- logout -----------------+
//! ```
//!
//! SECURITY
//! ========
//! Payloads are forwarded to the session store as received. The signature is
//! NOT verified here: doing so needs the bot token, which must never ship to
//! the browser. Treat the resulting session as a UI convenience only.
//!
//! ERROR HANDLING
//! ==============
//! Script-load and widget failures are logged and leave the bridge inert in
//! `Idle`. Nothing is retried and nothing is surfaced to the user.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use std::cell::Cell;
use std::rc::Rc;

use identity::IdentityRecord;
use serde_json::Value;

use super::config::WidgetConfig;
use crate::state::observer::{ReplayObservers, Subscription};
use crate::state::session::{SessionError, SessionStore};

/// Source of the third-party widget script.
pub const WIDGET_SCRIPT_SRC: &str = "https://telegram.org/js/telegram-widget.js";

/// Error raised by a [`WidgetHost`] or while handling a widget payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The widget script failed to load.
    #[error("widget script failed to load: {0}")]
    Script(String),
    /// The `Telegram.Login` global is missing or unusable.
    #[error("telegram widget is not available")]
    WidgetUnavailable,
    /// The widget invoked the callback with something that is not an identity record.
    #[error("unrecognized widget payload: {0}")]
    Payload(String),
    /// The record arrived but could not start a session.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Lifecycle of the login flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BridgePhase {
    #[default]
    Idle,
    ScriptLoading,
    WidgetReady,
    Authenticated,
}

/// Callback invoked once the script finished loading, successfully or not.
pub type ScriptLoaded = Box<dyn FnOnce(Result<(), BridgeError>)>;
/// Callback the host invokes with each raw payload from the widget.
pub type AuthHandler = Box<dyn Fn(Value)>;

/// Browser operations the bridge depends on.
pub trait WidgetHost {
    /// Whether the widget global is already present on the page.
    fn is_script_loaded(&self) -> bool;

    /// Inject the script at `src` and call `on_done` when it settles.
    fn load_script(&self, src: &str, on_done: ScriptLoaded);

    /// Open the login widget with `options`, routing payloads to `on_auth`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::WidgetUnavailable`] if the widget global is
    /// missing, or another [`BridgeError`] if invoking it throws.
    fn open_widget(&self, options: &Value, on_auth: AuthHandler) -> Result<(), BridgeError>;
}

/// Host for environments without a DOM. Every operation is inert.
#[derive(Clone, Copy, Debug, Default)]
pub struct InertWidgetHost;

impl WidgetHost for InertWidgetHost {
    fn is_script_loaded(&self) -> bool {
        false
    }

    fn load_script(&self, _src: &str, on_done: ScriptLoaded) {
        on_done(Err(BridgeError::Script("no browser environment".to_owned())));
    }

    fn open_widget(&self, _options: &Value, _on_auth: AuthHandler) -> Result<(), BridgeError> {
        Err(BridgeError::WidgetUnavailable)
    }
}

/// Host for the current environment.
pub fn default_host() -> Box<dyn WidgetHost> {
    #[cfg(feature = "hydrate")]
    {
        Box::new(super::widget_host::BrowserWidgetHost::new())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Box::new(InertWidgetHost)
    }
}

type Listener = Box<dyn Fn(&IdentityRecord)>;

struct BridgeInner {
    host: Box<dyn WidgetHost>,
    store: SessionStore,
    config: WidgetConfig,
    phase: ReplayObservers<BridgePhase>,
    script_requested: Cell<bool>,
    listener: Option<Listener>,
}

/// Drives the login widget and feeds its payloads into a [`SessionStore`].
///
/// Clones share state.
#[derive(Clone)]
pub struct WidgetBridge {
    inner: Rc<BridgeInner>,
}

impl WidgetBridge {
    /// Create a bridge. Starts `Authenticated` if `store` already holds a
    /// current record.
    pub fn new(host: Box<dyn WidgetHost>, store: SessionStore, config: WidgetConfig) -> Self {
        Self::build(host, store, config, None)
    }

    /// Create a bridge that also calls `listener` after each successful login.
    pub fn with_listener(
        host: Box<dyn WidgetHost>,
        store: SessionStore,
        config: WidgetConfig,
        listener: impl Fn(&IdentityRecord) + 'static,
    ) -> Self {
        Self::build(host, store, config, Some(Box::new(listener)))
    }

    fn build(host: Box<dyn WidgetHost>, store: SessionStore, config: WidgetConfig, listener: Option<Listener>) -> Self {
        let initial = if store.is_authenticated() { BridgePhase::Authenticated } else { BridgePhase::Idle };
        let bridge = Self {
            inner: Rc::new(BridgeInner {
                host,
                store,
                config,
                phase: ReplayObservers::new(initial),
                script_requested: Cell::new(false),
                listener,
            }),
        };

        // Follow session changes made outside the bridge, e.g. another tab.
        let weak = Rc::downgrade(&bridge.inner);
        bridge
            .inner
            .store
            .subscribe(move |record| {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.follow_session(record.is_some());
                }
            })
            .detach();
        bridge
    }

    fn follow_session(&self, authenticated: bool) {
        match (authenticated, self.phase()) {
            (true, _) => self.transition(BridgePhase::Authenticated),
            (false, BridgePhase::Authenticated) => self.transition(BridgePhase::Idle),
            (false, _) => {}
        }
    }

    pub fn phase(&self) -> BridgePhase {
        self.inner.phase.last()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Observe phase transitions, replaying the current phase first.
    pub fn subscribe_phase(&self, observer: impl Fn(&BridgePhase) + 'static) -> Subscription {
        self.inner.phase.subscribe(observer)
    }

    fn transition(&self, next: BridgePhase) {
        if self.phase() != next {
            self.inner.phase.emit(next);
        }
    }

    /// Begin the login flow in response to a user action.
    ///
    /// Loads the widget script at most once, then opens the widget. Calls made
    /// while the script is still loading are ignored.
    pub fn start_login(&self) {
        if self.phase() == BridgePhase::ScriptLoading {
            return;
        }
        if self.inner.host.is_script_loaded() {
            self.open_widget();
            return;
        }
        if self.inner.script_requested.get() {
            // An earlier injection settled without exposing the widget global.
            leptos::logging::error!("{}", BridgeError::WidgetUnavailable);
            return;
        }

        self.inner.script_requested.set(true);
        self.transition(BridgePhase::ScriptLoading);
        let bridge = self.clone();
        self.inner.host.load_script(
            WIDGET_SCRIPT_SRC,
            Box::new(move |result| match result {
                Ok(()) => bridge.open_widget(),
                Err(e) => {
                    leptos::logging::error!("{e}");
                    bridge.transition(BridgePhase::Idle);
                }
            }),
        );
    }

    fn open_widget(&self) {
        let bridge = self.clone();
        let on_auth: AuthHandler = Box::new(move |payload| {
            if let Err(e) = bridge.handle_payload(payload) {
                leptos::logging::warn!("login ignored: {e}");
            }
        });

        leptos::logging::log!("opening telegram widget for bot {}", self.inner.config.bot_name);
        match self.inner.host.open_widget(&self.inner.config.auth_options(), on_auth) {
            Ok(()) => self.transition(BridgePhase::WidgetReady),
            Err(e) => {
                leptos::logging::error!("failed to open telegram widget: {e}");
                self.transition(BridgePhase::Idle);
            }
        }
    }

    /// Forward a raw widget payload to the session store.
    ///
    /// A `false` payload means the user dismissed the widget and is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Payload`] if the payload is not an identity
    /// record, or [`BridgeError::Session`] if the store refused it.
    pub fn handle_payload(&self, payload: Value) -> Result<(), BridgeError> {
        if matches!(payload, Value::Bool(false) | Value::Null) {
            leptos::logging::log!("telegram login dismissed");
            return Ok(());
        }
        let record = IdentityRecord::from_value(payload).map_err(|e| BridgeError::Payload(e.to_string()))?;
        let record = self.inner.store.accept(record)?;

        self.transition(BridgePhase::Authenticated);
        if let Some(listener) = &self.inner.listener {
            listener(&record);
        }
        Ok(())
    }

    /// End the session and return to `Idle`.
    pub fn logout(&self) {
        self.inner.store.clear();
        self.transition(BridgePhase::Idle);
    }
}

impl std::fmt::Debug for WidgetBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBridge")
            .field("phase", &self.phase())
            .field("bot_name", &self.inner.config.bot_name)
            .finish_non_exhaustive()
    }
}
