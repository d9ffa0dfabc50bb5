//! Scripted lines for the voice agent.
//!
//! The lines can be customized by placing a `script.toml` in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Instructions and fixed utterances for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// System instructions given to the realtime model.
    pub instructions: String,
    /// Said as soon as the agent joins the call.
    pub greeting: String,
    /// Said by the end-call tool right before hanging up.
    pub farewell: String,
    /// Said when the session ends while the call is still live.
    pub exit: String,
    /// Custom variables from config, available in all lines.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            instructions: "You are a medical appointment scheduling assistant. Your goal is to confirm upcoming appointments (5th June 2025 at 11:00 AM) and reschedule if needed."
                .to_string(),
            greeting: "Hello, this is Neha, calling from City Medical Center regarding your upcoming appointment. Is this a good time to speak?"
                .to_string(),
            farewell: "Goodbye!".to_string(),
            exit: "Thank you for your time. Goodbye!".to_string(),
            variables: HashMap::new(),
        }
    }
}

impl Script {
    /// Load the script, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut script = Script::default();

        if let Some(dir) = custom_dir {
            let script_path = PathBuf::from(shellexpand::tilde(dir).to_string()).join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                script = toml::from_str(&content)?;
            }
        }

        if let Some(vars) = custom_variables {
            script.variables = vars.clone();
        }

        Ok(script)
    }

    /// Render a template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// A copy of this script with every line rendered against the custom variables.
    pub fn rendered(&self) -> Self {
        Self {
            instructions: Self::render(&self.instructions, &self.variables),
            greeting: Self::render(&self.greeting, &self.variables),
            farewell: Self::render(&self.farewell, &self.variables),
            exit: Self::render(&self.exit, &self.variables),
            variables: self.variables.clone(),
        }
    }
}
