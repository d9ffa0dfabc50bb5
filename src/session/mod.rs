//! Session bootstrap: realtime model, pipeline and the agent session run loop.
//!
//! Audio streaming, turn detection and the meeting transport belong to the
//! realtime engine. This module builds what the engine needs (a
//! [`SessionPlan`]) and reacts to the events it reports through a
//! [`SessionTransport`].

mod console;
mod model;
#[cfg(test)]
pub(crate) mod testing;

pub use console::ConsoleTransport;
pub use model::{required_env_keys, RealtimeModel, RealtimePipeline};

use crate::agent::{parse_tool_call, ToolContext, VoiceAgent};
use crate::config::{Secret, Settings, ValidatedEnv};
use crate::config::env::{VIDEOSDK_AUTH_TOKEN, VIDEOSDK_MEETING_ID};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Actions the agent and its tools can take on a live call.
#[async_trait]
pub trait CallControl: Send + Sync {
    /// Speak a fixed line to the other party.
    async fn say(&self, text: &str) -> Result<()>;

    /// Ask the host to terminate the call.
    async fn hangup(&self) -> Result<()>;

    /// Whether the call is still connected.
    fn is_live(&self) -> bool;
}

/// The seam to a realtime engine hosting the call.
#[async_trait]
pub trait SessionTransport: CallControl {
    /// Join the meeting with the given plan.
    async fn connect(&self, plan: &SessionPlan) -> Result<()>;

    /// Next event from the engine, or `None` once the stream is exhausted.
    async fn next_event(&self) -> Result<Option<SessionEvent>>;

    /// Return a tool's result record to the model.
    async fn send_tool_result(&self, call_id: &str, output: &Value) -> Result<()>;
}

/// Something the engine reports during a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The model wants to call a tool.
    ToolCall {
        #[serde(default)]
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    /// A finished utterance from either side.
    Transcript { role: String, text: String },
    /// The remote side left.
    Closed,
}

/// Meeting the agent joins.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub name: String,
    pub meeting_id: String,
    pub auth_token: Secret,
}

impl SessionContext {
    pub fn from_env(name: &str, env: &ValidatedEnv) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            meeting_id: env.get(VIDEOSDK_MEETING_ID)?.to_string(),
            auth_token: env.secret(VIDEOSDK_AUTH_TOKEN)?,
        })
    }
}

/// Everything the engine needs to start a call. Serializes with secrets redacted.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    pub session_id: Uuid,
    pub agent: VoiceAgent,
    pub pipeline: RealtimePipeline,
    pub context: SessionContext,
}

impl SessionPlan {
    pub fn new(agent: VoiceAgent, pipeline: RealtimePipeline, context: SessionContext) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            agent,
            pipeline,
            context,
        }
    }

    /// Build the plan for the configured provider from validated environment.
    pub fn from_settings(settings: &Settings, agent: VoiceAgent, env: &ValidatedEnv) -> Result<Self> {
        let model = RealtimeModel::from_settings(&settings.realtime, env)?;
        let context = SessionContext::from_env(&settings.agent.name, env)?;
        Ok(Self::new(agent, RealtimePipeline::new(model), context))
    }
}

/// Record of a tool call made during the session.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: Value,
    /// Record returned to the model.
    pub output: Value,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

/// Outcome of a finished session.
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub tool_calls: Vec<ToolCallRecord>,
    /// Whether the agent hung up (as opposed to the remote side leaving).
    pub ended_by_agent: bool,
}

/// A running agent bound to one meeting through a transport.
pub struct AgentSession<T: SessionTransport> {
    plan: SessionPlan,
    tools: ToolContext,
    transport: T,
}

impl<T: SessionTransport> AgentSession<T> {
    pub fn new(plan: SessionPlan, tools: ToolContext, transport: T) -> Self {
        Self {
            plan,
            tools,
            transport,
        }
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Join the call, greet, serve tool calls until the call ends, then run the exit hook.
    ///
    /// The exit hook runs even when the transport fails part way; the failure is
    /// returned afterwards.
    #[instrument(skip(self), fields(session_id = %self.plan.session_id, meeting_id = %self.plan.context.meeting_id))]
    pub async fn run(&self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let served = self.serve_events(&mut summary).await;

        let exited = self.plan.agent.on_exit(&self.transport).await;
        if let Err(e) = &served {
            warn!("Session failed: {}", e);
        }
        served?;
        exited?;

        info!("Session finished after {} tool call(s)", summary.tool_calls.len());
        Ok(summary)
    }

    async fn serve_events(&self, summary: &mut SessionSummary) -> Result<()> {
        self.transport.connect(&self.plan).await?;
        info!("Session started with {}", self.plan.pipeline.model.provider());

        self.plan.agent.on_enter(&self.transport).await?;

        let mut remote_closed = false;

        while self.transport.is_live() {
            let Some(event) = self.transport.next_event().await? else {
                break;
            };

            match event {
                SessionEvent::ToolCall {
                    call_id,
                    name,
                    arguments,
                } => {
                    let output = self.handle_tool_call(&name, &arguments).await;
                    let sent = if self.transport.is_live() {
                        self.transport.send_tool_result(&call_id, &output).await
                    } else {
                        Ok(())
                    };
                    summary.tool_calls.push(ToolCallRecord {
                        name,
                        arguments,
                        output,
                    });
                    sent?;
                }
                SessionEvent::Transcript { role, text } => {
                    debug!("{}: {}", role, text);
                }
                SessionEvent::Closed => {
                    remote_closed = true;
                    break;
                }
            }
        }

        summary.ended_by_agent = !remote_closed && !self.transport.is_live();
        Ok(())
    }

    /// Run one tool. Failures become an `{error}` record so the model can recover.
    async fn handle_tool_call(&self, name: &str, arguments: &Value) -> Value {
        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => self.tools.execute(&tool, &self.transport).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                json!({ "error": e.to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::agent::WeatherClient;
    use crate::config::{EnvSnapshot, Script};
    use crate::config::env::OPENAI_API_KEY;
    use crate::error::CallbotError;
    use std::time::Duration;

    fn session(events: Vec<SessionEvent>) -> AgentSession<ScriptedTransport> {
        let env = EnvSnapshot::from_pairs([
            (OPENAI_API_KEY, Some("sk-test")),
            (VIDEOSDK_MEETING_ID, Some("abcd-efgh-ijkl")),
            (VIDEOSDK_AUTH_TOKEN, Some("vsdk-token")),
        ])
        .validate()
        .unwrap();
        let script = Script::default();
        let plan = SessionPlan::from_settings(&Settings::default(), VoiceAgent::new(&script), &env).unwrap();
        let tools = ToolContext::new(
            WeatherClient::new("http://127.0.0.1:9/v1/forecast"),
            &script.farewell,
            Duration::ZERO,
        );
        AgentSession::new(plan, tools, ScriptedTransport::new(events))
    }

    fn tool_call(id: &str, name: &str, arguments: Value) -> SessionEvent {
        SessionEvent::ToolCall {
            call_id: id.to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_greets_dispatches_and_ends_on_end_call() {
        let session = session(vec![
            SessionEvent::Transcript {
                role: "caller".to_string(),
                text: "I'm an Aries".to_string(),
            },
            tool_call("c1", "get_horoscope", json!({"sign": "Aries"})),
            tool_call("c2", "end_call", json!({})),
            tool_call("c3", "get_horoscope", json!({"sign": "Taurus"})),
        ]);

        let summary = session.run().await.unwrap();
        assert!(summary.ended_by_agent);
        assert_eq!(summary.tool_calls.len(), 2);
        assert_eq!(summary.tool_calls[1].to_string(), "end_call({})");

        let transport = session.into_transport();
        let events = transport.control.events();
        assert!(events[0].starts_with("say:Hello, this is Neha"));
        assert_eq!(&events[1..], ["say:Goodbye!", "hangup"]);
        assert_eq!(
            transport.results(),
            vec![(
                "c1".to_string(),
                json!({"sign": "Aries", "horoscope": "Today is your lucky day!"})
            )]
        );
        assert!(transport.connected_plan().unwrap().contains("\"provider\":\"openai\""));
    }

    #[tokio::test]
    async fn test_tool_failure_is_returned_as_record() {
        let session = session(vec![
            tool_call("c1", "get_weather", json!({"latitude": "north", "longitude": "13.4"})),
            tool_call("c2", "order_pizza", json!({})),
            SessionEvent::Closed,
        ]);

        let summary = session.run().await.unwrap();
        assert!(!summary.ended_by_agent);

        let transport = session.into_transport();
        let results = transport.results();
        assert_eq!(results.len(), 2);
        assert!(results[0].1["error"].as_str().unwrap().contains("latitude must be numeric"));
        assert!(results[1].1["error"].as_str().unwrap().contains("Unknown tool"));
        // Remote side left while the call was still up, so the exit line is said
        assert_eq!(
            transport.control.events().last().unwrap(),
            "say:Thank you for your time. Goodbye!"
        );
    }

    #[tokio::test]
    async fn test_exit_hook_runs_when_transport_fails() {
        let mut session = session(vec![tool_call("c1", "get_horoscope", json!({"sign": "Aries"}))]);
        session.transport.fail_after_events = true;

        let err = session.run().await.unwrap_err();
        assert!(matches!(err, CallbotError::Session(_)));

        let transport = session.into_transport();
        let events = transport.control.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("say:Hello, this is Neha"));
        assert_eq!(events[1], "say:Thank you for your time. Goodbye!");
        assert_eq!(transport.results().len(), 1);
    }

    #[test]
    fn test_plan_never_serializes_secrets() {
        let session = session(Vec::new());
        let rendered = serde_json::to_string(session.plan()).unwrap();
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("vsdk-token"));
        assert!(rendered.contains("abcd-efgh-ijkl"));
        assert!(rendered.contains("gpt-4o-realtime-preview"));
        assert!(rendered.contains("get_weather"));
    }

    #[test]
    fn test_event_wire_format() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"type":"tool_call","call_id":"7","name":"end_call"}"#).unwrap();
        assert_eq!(event, tool_call("7", "end_call", Value::Null));
        let closed: SessionEvent = serde_json::from_str(r#"{"type":"closed"}"#).unwrap();
        assert_eq!(closed, SessionEvent::Closed);
    }
}
