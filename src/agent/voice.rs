//! The voice agent descriptor and its lifecycle hooks.

use super::tools::{tool_definitions, ToolDefinition};
use crate::config::Script;
use crate::error::Result;
use crate::session::CallControl;
use serde::Serialize;
use tracing::info;

/// Instructions, scripted lines and tools for one call. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceAgent {
    instructions: String,
    tools: Vec<ToolDefinition>,
    #[serde(skip)]
    greeting: String,
    #[serde(skip)]
    exit_line: String,
}

impl VoiceAgent {
    /// Create an agent from a rendered script with the default tool set.
    pub fn new(script: &Script) -> Self {
        Self {
            instructions: script.instructions.clone(),
            tools: tool_definitions(),
            greeting: script.greeting.clone(),
            exit_line: script.exit.clone(),
        }
    }

    /// Called once the agent has joined the call.
    pub async fn on_enter(&self, control: &dyn CallControl) -> Result<()> {
        control.say(&self.greeting).await
    }

    /// Called when the session is over.
    pub async fn on_exit(&self, control: &dyn CallControl) -> Result<()> {
        info!("Call ended");
        if control.is_live() {
            control.say(&self.exit_line).await?;
        }
        Ok(())
    }
}
