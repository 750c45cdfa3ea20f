//! Login widget configuration.
//!
//! The host server reads it from the environment and publishes every setting
//! in `<meta>` tags; the hydrated client reads those tags back.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde_json::{Value, json};

pub const DEFAULT_BOT_ID: i64 = 8_016_901_412;
pub const DEFAULT_BOT_NAME: &str = "betsson_test_bot";
pub const DEFAULT_CORNER_RADIUS: u32 = 20;

/// Environment key and the `<meta name=..>` that carries it in the SSR shell.
pub const META_KEYS: [(&str, &str); 6] = [
    ("TELEGRAM_BOT_ID", "telegram-bot-id"),
    ("TELEGRAM_BOT_NAME", "telegram-bot-name"),
    ("TELEGRAM_CORNER_RADIUS", "telegram-corner-radius"),
    ("TELEGRAM_REQUEST_WRITE", "telegram-request-write"),
    ("TELEGRAM_BUTTON_SIZE", "telegram-button-size"),
    ("TELEGRAM_USE_PIC", "telegram-use-pic"),
];

/// Rendered size of the Telegram login button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonSize {
    #[default]
    Large,
    Medium,
    Small,
}

impl ButtonSize {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Small => "small",
        }
    }

    /// Parse `large`/`medium`/`small`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "large" => Some(Self::Large),
            "medium" => Some(Self::Medium),
            "small" => Some(Self::Small),
            _ => None,
        }
    }
}

/// Extra permission requested from the user at login.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestAccess {
    /// Allow the bot to send the user messages.
    Write,
}

/// Options handed to `Telegram.Login.auth`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub bot_id: i64,
    pub bot_name: String,
    pub corner_radius: u32,
    pub request_access: Option<RequestAccess>,
    pub button_size: ButtonSize,
    pub use_pic: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            bot_id: DEFAULT_BOT_ID,
            bot_name: DEFAULT_BOT_NAME.to_owned(),
            corner_radius: DEFAULT_CORNER_RADIUS,
            request_access: None,
            button_size: ButtonSize::Large,
            use_pic: true,
        }
    }
}

impl WidgetConfig {
    /// Build config from environment variables, defaulting anything missing
    /// or unparsable.
    ///
    /// - `TELEGRAM_BOT_ID`
    /// - `TELEGRAM_BOT_NAME`
    /// - `TELEGRAM_CORNER_RADIUS`
    /// - `TELEGRAM_REQUEST_WRITE`: truthy to request write access
    /// - `TELEGRAM_BUTTON_SIZE`: `large`, `medium`, or `small`
    /// - `TELEGRAM_USE_PIC`: falsy to hide the user photo
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let bot_id = lookup("TELEGRAM_BOT_ID")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(defaults.bot_id);
        let bot_name = lookup("TELEGRAM_BOT_NAME")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.bot_name);
        let corner_radius = lookup("TELEGRAM_CORNER_RADIUS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(defaults.corner_radius);
        let request_access = match lookup("TELEGRAM_REQUEST_WRITE").as_deref().and_then(parse_bool) {
            Some(true) => Some(RequestAccess::Write),
            _ => defaults.request_access,
        };
        let button_size = lookup("TELEGRAM_BUTTON_SIZE")
            .as_deref()
            .and_then(ButtonSize::parse)
            .unwrap_or(defaults.button_size);
        let use_pic = lookup("TELEGRAM_USE_PIC")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(defaults.use_pic);

        Self { bot_id, bot_name, corner_radius, request_access, button_size, use_pic }
    }

    /// Build config from `<meta>` contents keyed by tag name.
    pub fn from_meta(meta: impl Fn(&str) -> Option<String>) -> Self {
        Self::from_lookup(|key| {
            META_KEYS
                .iter()
                .find(|(env_key, _)| *env_key == key)
                .and_then(|(_, name)| meta(name))
        })
    }

    /// `(meta name, content)` pairs for the SSR shell, in the format
    /// [`WidgetConfig::from_meta`] reads back.
    #[must_use]
    pub fn meta_tags(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.bot_id.to_string(),
            self.bot_name.clone(),
            self.corner_radius.to_string(),
            (self.request_access == Some(RequestAccess::Write)).to_string(),
            self.button_size.as_str().to_owned(),
            self.use_pic.to_string(),
        ];
        META_KEYS.iter().map(|(_, name)| *name).zip(values).collect()
    }

    /// Read the settings the SSR shell published in `<meta>` tags.
    ///
    /// Falls back to defaults outside the browser or when tags are missing.
    #[must_use]
    pub fn from_page() -> Self {
        #[cfg(feature = "hydrate")]
        {
            Self::from_meta(|name| {
                let document = web_sys::window()?.document()?;
                let selector = format!("meta[name=\"{name}\"]");
                document.query_selector(&selector).ok()??.get_attribute("content")
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Self::default()
        }
    }

    /// JSON options object for `Telegram.Login.auth`.
    #[must_use]
    pub fn auth_options(&self) -> Value {
        let request_access = match self.request_access {
            Some(RequestAccess::Write) => json!("write"),
            None => json!(false),
        };
        json!({
            "bot_id": self.bot_id,
            "bot_name": self.bot_name,
            "request_access": request_access,
            "button_size": self.button_size.as_str(),
            "radius": self.corner_radius,
            "usePic": self.use_pic,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
