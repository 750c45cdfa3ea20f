//! "Log in with Telegram" button.

use leptos::prelude::*;

use crate::net::widget::BridgePhase;
use crate::state::context::SessionContext;
use crate::util::format::login_button_label;

/// Starts the widget login flow on click.
#[component]
pub fn TelegramLogin() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let phase = session.phase;

    let on_click = move |_| session.start_login();

    view! {
        <button
            class="login-button login-button--telegram"
            on:click=on_click
            disabled=move || phase.get() == BridgePhase::ScriptLoading
        >
            {move || login_button_label(phase.get())}
        </button>
    }
}
