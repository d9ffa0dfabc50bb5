//! Required environment variables and secret handling.
//!
//! Every entry point declares the keys it needs up front. They are read once,
//! checked together, and only then handed to the code that uses them, so a
//! misconfigured run fails before any network activity.

use crate::error::{CallbotError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const VIDEOSDK_MEETING_ID: &str = "VIDEOSDK_MEETING_ID";
pub const VIDEOSDK_AUTH_TOKEN: &str = "VIDEOSDK_AUTH_TOKEN";
pub const VIDEOSDK_SIP_USERNAME: &str = "VIDEOSDK_SIP_USERNAME";
pub const VIDEOSDK_SIP_PASSWORD: &str = "VIDEOSDK_SIP_PASSWORD";
pub const TWILIO_SID: &str = "TWILIO_SID";
pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const TWILIO_PHONE_NUMBER: &str = "TWILIO_PHONE_NUMBER";
pub const TO_PHONE_NUMBER: &str = "TO_PHONE_NUMBER";

/// Keys whose values are credentials and must never be printed.
const SECRET_KEYS: &[&str] = &[
    OPENAI_API_KEY,
    GOOGLE_API_KEY,
    VIDEOSDK_AUTH_TOKEN,
    VIDEOSDK_SIP_PASSWORD,
    TWILIO_AUTH_TOKEN,
];

/// Load a `.env` file from the working directory, if one exists.
///
/// Runs before logging is set up, so the caller reports the outcome.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(CallbotError::Config(format!("Unreadable .env file: {}", e))),
    }
}

/// Whether the named key holds a credential.
pub fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

/// A credential string that renders as `[REDACTED]` everywhere except [`Secret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Only call this at the point the credential leaves the process.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

/// Values read for a set of required keys, in declaration order.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
    entries: Vec<(String, Option<String>)>,
}

impl EnvSnapshot {
    /// Read each key from the process environment.
    pub fn capture(keys: &[&str]) -> Self {
        Self {
            entries: keys
                .iter()
                .map(|k| (k.to_string(), std::env::var(k).ok()))
                .collect(),
        }
    }

    /// Build a snapshot from explicit values.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    /// Replace (or add) a value, e.g. from a CLI flag.
    pub fn with_value(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    /// Key names, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Names of keys with no usable value, in declaration order.
    pub fn missing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Check that every key is set and non-empty.
    pub fn validate(self) -> Result<ValidatedEnv> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(CallbotError::MissingEnv(missing));
        }

        Ok(ValidatedEnv {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| (k, v.unwrap_or_default()))
                .collect(),
        })
    }
}

/// A snapshot in which every key is known to be present.
#[derive(Clone)]
pub struct ValidatedEnv {
    entries: Vec<(String, String)>,
}

impl ValidatedEnv {
    /// Value of a validated key.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| CallbotError::Config(format!("{} was not part of the validated set", key)))
    }

    /// Value of a validated key, wrapped as a [`Secret`].
    pub fn secret(&self, key: &str) -> Result<Secret> {
        self.get(key).map(Secret::new)
    }

    /// Key names, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Debug for ValidatedEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.entries {
            if is_secret_key(k) {
                map.entry(k, &"[REDACTED]");
            } else {
                map.entry(k, v);
            }
        }
        map.finish()
    }
}
