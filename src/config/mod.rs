//! Configuration module for callbot.
//!
//! Handles required environment variables, application settings and the
//! agent's scripted lines.

pub mod env;
mod script;
mod settings;

pub use env::{load_dotenv, EnvSnapshot, Secret, ValidatedEnv};
pub use script::Script;
pub use settings::{
    AgentSettings, GeneralSettings, PromptSettings, RealtimeModelSettings, RealtimeProvider,
    RealtimeSettings, ServerSettings, Settings, TelephonySettings, WeatherSettings,
};
