//! Identity record returned by the Telegram Login Widget.
//!
//! This crate owns the payload shape shared by the browser `client`, the host
//! server, and the `cli`. Field names match the widget callback exactly so a
//! record survives a JSON round-trip through `localStorage` unchanged.
//!
//! SESSION LIFETIME
//! ================
//! A record is considered current for [`SESSION_TTL_SECS`] after its
//! `auth_date`. Staleness is a read-time judgement: nothing here deletes or
//! mutates a stale record, callers simply treat it as absent.

pub mod verify;


use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Seconds after `auth_date` during which a record is considered current.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Error returned when a record cannot be converted to or from JSON.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The payload was not valid JSON or did not match the record shape.
    #[error("invalid identity record json: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-identifying payload delivered by the login widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Telegram user id.
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Seconds since the Unix epoch when Telegram issued the payload.
    pub auth_date: i64,
    /// Opaque signature over the other fields. Never checked in the browser.
    pub hash: String,
}

impl IdentityRecord {
    /// Decode a record from its JSON text form.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if `raw` is not a JSON object of the
    /// expected shape.
    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decode a record from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if `value` does not match the record shape.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode the record as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Seconds elapsed between `auth_date` and `now_secs`. Negative when the
    /// record claims to come from the future.
    #[must_use]
    pub fn age_secs(&self, now_secs: i64) -> i64 {
        now_secs.saturating_sub(self.auth_date)
    }

    /// Whether the record is still inside the session window at `now_secs`.
    #[must_use]
    pub fn is_fresh(&self, now_secs: i64) -> bool {
        self.age_secs(now_secs) < SESSION_TTL_SECS
    }

    /// First and last name joined for display.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    /// `@username` when the user has a public username.
    #[must_use]
    pub fn handle(&self) -> Option<String> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("@{name}"))
    }
}
