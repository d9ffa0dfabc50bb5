//! Agent command implementation.

use crate::agent::{ToolContext, VoiceAgent, WeatherClient};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{RealtimeProvider, Script, Settings};
use crate::session::{AgentSession, ConsoleTransport, SessionPlan};
use anyhow::Result;
use tracing::error;

/// Run the agent command.
pub async fn run_agent(
    print_plan: bool,
    provider: Option<RealtimeProvider>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(provider) = provider {
        settings.realtime.provider = provider;
    }

    // Pre-flight checks
    let env = match preflight::check(&Operation::Agent(settings.realtime.provider)) {
        Ok(env) => env,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'callbot doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let script = Script::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?
    .rendered();

    let plan = SessionPlan::from_settings(&settings, VoiceAgent::new(&script), &env)?;

    if print_plan {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let tools = ToolContext::new(
        WeatherClient::new(&settings.weather.endpoint),
        &script.farewell,
        settings.end_call_pause(),
    );
    let session = AgentSession::new(plan, tools, ConsoleTransport::stdio());

    Output::info("Rehearsing the call on the console.");
    Output::info("Type what the caller says, or a JSON event such as");
    Output::info(r#"  {"type":"tool_call","call_id":"1","name":"get_horoscope","arguments":{"sign":"Aries"}}"#);
    Output::info("Ctrl+D leaves the call.");

    match session.run().await {
        Ok(summary) => {
            if !summary.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", summary.tool_calls.len()));
                for call in &summary.tool_calls {
                    Output::info(&format!("  {}", call));
                }
                println!();
            }

            if summary.ended_by_agent {
                Output::success("Agent ended the call.");
            } else {
                Output::success("Caller left the call.");
            }
        }
        Err(e) => {
            error!("Agent session failed: {}", e);
            Output::error(&format!("Agent session failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
