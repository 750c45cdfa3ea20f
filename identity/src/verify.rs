//! HMAC signature check for widget payloads.
//!
//! The check needs the bot token, so it belongs on a server or an operator's
//! machine. The browser client never calls into this module; it forwards
//! payloads unverified.
//!
//! ALGORITHM
//! =========
//! 1. Build the data-check-string: every present field except `hash`, as
//!    `key=value`, sorted by key, joined with `\n`.
//! 2. Secret key is `SHA256(bot_token)`.
//! 3. Expected hash is lowercase hex `HMAC_SHA256(secret, data_check_string)`.

#[cfg(test)]
#[path = "verify_test.rs"]
mod verify_test;

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::IdentityRecord;

type HmacSha256 = Hmac<Sha256>;

/// Error returned by [`check_signature`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    /// The bot token was empty.
    #[error("bot token is empty")]
    EmptyToken,
    /// The record's `hash` field is not valid hex.
    #[error("signature is not valid hex: {0}")]
    Encoding(String),
    /// The HMAC key could not be initialised.
    #[error("invalid hmac key: {0}")]
    Key(String),
    /// The signature does not match the record contents.
    #[error("signature mismatch")]
    Mismatch,
}

/// Build the newline-joined, key-sorted `key=value` string Telegram signs.
#[must_use]
pub fn data_check_string(record: &IdentityRecord) -> String {
    let mut fields: BTreeMap<&'static str, String> = BTreeMap::new();
    fields.insert("id", record.id.to_string());
    fields.insert("first_name", record.first_name.clone());
    fields.insert("auth_date", record.auth_date.to_string());
    if let Some(last_name) = &record.last_name {
        fields.insert("last_name", last_name.clone());
    }
    if let Some(username) = &record.username {
        fields.insert("username", username.clone());
    }
    if let Some(photo_url) = &record.photo_url {
        fields.insert("photo_url", photo_url.clone());
    }

    fields
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn mac_for(record: &IdentityRecord, bot_token: &str) -> Result<HmacSha256, VerifyError> {
    if bot_token.is_empty() {
        return Err(VerifyError::EmptyToken);
    }
    let secret = Sha256::digest(bot_token.as_bytes());
    let mut mac = HmacSha256::new_from_slice(&secret).map_err(|e| VerifyError::Key(e.to_string()))?;
    mac.update(data_check_string(record).as_bytes());
    Ok(mac)
}

/// Compute the hex signature Telegram would attach to `record` for `bot_token`.
///
/// # Errors
///
/// Returns [`VerifyError::EmptyToken`] if `bot_token` is empty.
pub fn expected_hash(record: &IdentityRecord, bot_token: &str) -> Result<String, VerifyError> {
    let mac = mac_for(record, bot_token)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `record.hash` against the bot token in constant time.
///
/// # Errors
///
/// Returns [`VerifyError::Mismatch`] when the signature does not match,
/// [`VerifyError::Encoding`] when `record.hash` is not hex, and
/// [`VerifyError::EmptyToken`] when `bot_token` is empty.
pub fn check_signature(record: &IdentityRecord, bot_token: &str) -> Result<(), VerifyError> {
    let provided = hex::decode(record.hash.trim()).map_err(|e| VerifyError::Encoding(e.to_string()))?;
    let computed = mac_for(record, bot_token)?.finalize().into_bytes();
    if provided.len() != computed.len() {
        return Err(VerifyError::Mismatch);
    }
    if bool::from(provided.as_slice().ct_eq(computed.as_slice())) {
        Ok(())
    } else {
        Err(VerifyError::Mismatch)
    }
}
