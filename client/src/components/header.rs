//! Top bar showing the logged-in Telegram user or the login button.
//!
//! SYSTEM CONTEXT
//! ==============
//! Re-renders from the session signal only; logout goes through the bridge so
//! storage, subscribers, and the login phase stay in step.

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;

use crate::components::telegram_login::TelegramLogin;
use crate::state::context::SessionContext;
use crate::util::format::avatar_initials;

/// Application header.
#[component]
pub fn Header() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let user = session.user;

    let on_logout = move |_| session.logout();

    view! {
        <header class="header">
            <span class="header__title">"Telegram Login"</span>
            <span class="header__spacer"></span>
            <Show
                when=move || user.get().is_some()
                fallback=|| view! { <TelegramLogin/> }
            >
                {move || {
                    user.get()
                        .map(|record| {
                            let initials = avatar_initials(&record);
                            let name = record.display_name();
                            let handle = record.handle().unwrap_or_default();
                            let photo = record.photo_url.clone();
                            view! {
                                <span class="header__user">
                                    {match photo {
                                        Some(src) => view! { <img class="header__avatar" src=src alt=name.clone()/> }.into_any(),
                                        None => view! { <span class="header__avatar header__avatar--initials">{initials}</span> }.into_any(),
                                    }}
                                    <span class="header__name">{name}</span>
                                    <span class="header__handle">{handle}</span>
                                </span>
                            }
                        })
                }}
                <button class="btn header__logout" on:click=on_logout>
                    "Log out"
                </button>
            </Show>
        </header>
    }
}
