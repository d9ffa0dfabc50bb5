//! Realtime model backends and the pipeline wrapping them.

use crate::config::env::{GOOGLE_API_KEY, OPENAI_API_KEY, VIDEOSDK_AUTH_TOKEN, VIDEOSDK_MEETING_ID};
use crate::config::{RealtimeProvider, RealtimeSettings, Secret, ValidatedEnv};
use crate::error::Result;
use serde::Serialize;

/// A speech-to-speech model the engine streams call audio through.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum RealtimeModel {
    OpenAi {
        model: String,
        voice: String,
        api_key: Secret,
    },
    Gemini {
        model: String,
        voice: String,
        api_key: Secret,
    },
}

impl RealtimeModel {
    /// Build the configured backend. The provider's API key must be in `env`.
    pub fn from_settings(settings: &RealtimeSettings, env: &ValidatedEnv) -> Result<Self> {
        Ok(match settings.provider {
            RealtimeProvider::OpenAi => RealtimeModel::OpenAi {
                model: settings.openai.model.clone(),
                voice: settings.openai.voice.clone(),
                api_key: env.secret(OPENAI_API_KEY)?,
            },
            RealtimeProvider::Gemini => RealtimeModel::Gemini {
                model: settings.gemini.model.clone(),
                voice: settings.gemini.voice.clone(),
                api_key: env.secret(GOOGLE_API_KEY)?,
            },
        })
    }

    pub fn provider(&self) -> RealtimeProvider {
        match self {
            RealtimeModel::OpenAi { .. } => RealtimeProvider::OpenAi,
            RealtimeModel::Gemini { .. } => RealtimeProvider::Gemini,
        }
    }

    pub fn model_name(&self) -> &str {
        match self {
            RealtimeModel::OpenAi { model, .. } | RealtimeModel::Gemini { model, .. } => model,
        }
    }
}

/// Streams audio between the meeting and a realtime model.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimePipeline {
    pub model: RealtimeModel,
}

impl RealtimePipeline {
    pub fn new(model: RealtimeModel) -> Self {
        Self { model }
    }
}

/// Environment keys an agent session needs for the given provider.
pub fn required_env_keys(provider: RealtimeProvider) -> Vec<&'static str> {
    let api_key = match provider {
        RealtimeProvider::OpenAi => OPENAI_API_KEY,
        RealtimeProvider::Gemini => GOOGLE_API_KEY,
    };
    vec![api_key, VIDEOSDK_MEETING_ID, VIDEOSDK_AUTH_TOKEN]
}
