//! Configuration settings for callbot.
//!
//! Only non-secret tunables live here. Credentials and identifiers come from
//! the environment (see [`super::env`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub agent: AgentSettings,
    pub realtime: RealtimeSettings,
    pub weather: WeatherSettings,
    pub telephony: TelephonySettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when neither `-v` nor `RUST_LOG` is given.
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Agent identity and call pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Participant name the agent joins the meeting with.
    pub name: String,
    /// Pause between the farewell line and hanging up, in milliseconds.
    pub end_call_pause_ms: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: "VoiceAgent".to_string(),
            end_call_pause_ms: 1000,
        }
    }
}

/// Realtime speech-to-speech provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RealtimeProvider {
    /// OpenAI Realtime (default).
    #[default]
    OpenAi,
    /// Google Gemini Live.
    Gemini,
}

impl std::str::FromStr for RealtimeProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(RealtimeProvider::OpenAi),
            "gemini" | "google" => Ok(RealtimeProvider::Gemini),
            _ => Err(format!("Unknown realtime provider: {}", s)),
        }
    }
}

impl std::fmt::Display for RealtimeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RealtimeProvider::OpenAi => write!(f, "openai"),
            RealtimeProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Model and voice for one realtime backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeModelSettings {
    pub model: String,
    pub voice: String,
}

/// Realtime provider selection and per-backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeSettings {
    pub provider: RealtimeProvider,
    pub openai: RealtimeModelSettings,
    pub gemini: RealtimeModelSettings,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            provider: RealtimeProvider::OpenAi,
            openai: RealtimeModelSettings {
                model: "gpt-4o-realtime-preview".to_string(),
                voice: "alloy".to_string(),
            },
            gemini: RealtimeModelSettings {
                model: "gemini-2.0-flash-live-001".to_string(),
                voice: "Leda".to_string(),
            },
        }
    }
}

/// Weather tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Forecast endpoint; latitude and longitude are appended as query parameters.
    pub endpoint: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }
}

/// Telephony provider and SIP bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelephonySettings {
    /// Base URL of the telephony REST API.
    pub api_base: String,
    /// Domain of the meeting SIP gateway.
    pub sip_domain: String,
}

impl Default for TelephonySettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.twilio.com".to_string(),
            sip_domain: "sip.videosdk.live".to_string(),
        }
    }
}

/// TwiML webhook server bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Script customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory holding a `script.toml` that overrides the default lines.
    pub custom_dir: Option<String>,
    /// Custom variables available in every line as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("callbot")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Pause before hanging up after the farewell line.
    pub fn end_call_pause(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.agent.end_call_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.agent.name, "VoiceAgent");
        assert_eq!(settings.realtime.provider, RealtimeProvider::OpenAi);
        assert_eq!(settings.realtime.openai.model, "gpt-4o-realtime-preview");
        assert_eq!(settings.telephony.sip_domain, "sip.videosdk.live");
        assert_eq!(settings.end_call_pause(), std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[realtime]\nprovider = \"gemini\"\n\n[telephony]\nsip_domain = \"sip.example.test\""
        )
        .unwrap();

        let settings = Settings::load_from(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(settings.realtime.provider, RealtimeProvider::Gemini);
        assert_eq!(settings.realtime.gemini.voice, "Leda");
        assert_eq!(settings.telephony.sip_domain, "sip.example.test");
        assert_eq!(settings.telephony.api_base, "https://api.twilio.com");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<RealtimeProvider>().unwrap(), RealtimeProvider::OpenAi);
        assert_eq!("google".parse::<RealtimeProvider>().unwrap(), RealtimeProvider::Gemini);
        assert!("azure".parse::<RealtimeProvider>().is_err());
    }
}
