//! Landing page: a welcome card for the current user, or a login prompt.

use leptos::prelude::*;

use crate::components::telegram_login::TelegramLogin;
use crate::state::context::SessionContext;
use crate::util::format::format_auth_age;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let user = session.user;

    view! {
        <main class="home-page">
            <Show
                when=move || user.get().is_some()
                fallback=|| {
                    view! {
                        <div class="login-card">
                            <h1>"Welcome"</h1>
                            <p class="login-card__subtitle">"Sign in with your Telegram account to continue."</p>
                            <TelegramLogin/>
                        </div>
                    }
                }
            >
                {move || {
                    user.get()
                        .map(|record| {
                            let age = format_auth_age(record.age_secs(session.now_secs()));
                            view! {
                                <div class="welcome-card">
                                    <h1>{format!("Hello, {}", record.display_name())}</h1>
                                    <dl class="welcome-card__details">
                                        <dt>"Telegram id"</dt>
                                        <dd>{record.id}</dd>
                                        <dt>"Username"</dt>
                                        <dd>{record.handle().unwrap_or_else(|| "none".to_owned())}</dd>
                                        <dt>"Signed in"</dt>
                                        <dd>{age}</dd>
                                    </dl>
                                    <p class="welcome-card__note">
                                        "This session is stored in your browser only and is not verified by a server."
                                    </p>
                                </div>
                            }
                        })
                }}
            </Show>
        </main>
    }
}
