//! Pure display helpers for session UI.
//!
//! Kept free of Leptos so they can be unit tested on native targets.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use identity::IdentityRecord;

use crate::net::widget::BridgePhase;

/// Up to two uppercase initials for the avatar fallback.
pub fn avatar_initials(record: &IdentityRecord) -> String {
    [Some(record.first_name.as_str()), record.last_name.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Human-readable age of a login, e.g. `"12 min ago"`.
pub fn format_auth_age(age_secs: i64) -> String {
    match age_secs {
        i64::MIN..60 => "just now".to_owned(),
        60..3_600 => format!("{} min ago", age_secs / 60),
        3_600..identity::SESSION_TTL_SECS => format!("{} h ago", age_secs / 3_600),
        _ => "expired".to_owned(),
    }
}

/// Label for the login button in `phase`.
pub fn login_button_label(phase: BridgePhase) -> &'static str {
    match phase {
        BridgePhase::ScriptLoading => "Loading Telegram...",
        BridgePhase::Idle | BridgePhase::WidgetReady | BridgePhase::Authenticated => "Log in with Telegram",
    }
}
