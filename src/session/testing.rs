//! In-memory call control and transport for tests.

use super::{CallControl, SessionEvent, SessionPlan, SessionTransport};
use crate::error::{CallbotError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Records `say:<text>` and `hangup` in order.
pub(crate) struct RecordingControl {
    events: Mutex<Vec<String>>,
    live: AtomicBool,
}

impl Default for RecordingControl {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            live: AtomicBool::new(true),
        }
    }
}

impl RecordingControl {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallControl for RecordingControl {
    async fn say(&self, text: &str) -> Result<()> {
        self.events.lock().unwrap().push(format!("say:{}", text));
        Ok(())
    }

    async fn hangup(&self) -> Result<()> {
        self.events.lock().unwrap().push("hangup".to_string());
        self.live.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Replays a fixed list of events.
pub(crate) struct ScriptedTransport {
    pub(crate) control: RecordingControl,
    /// Once the events run out, fail like a dropped connection instead of ending the stream.
    pub(crate) fail_after_events: bool,
    events: Mutex<VecDeque<SessionEvent>>,
    results: Mutex<Vec<(String, Value)>>,
    plan: Mutex<Option<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new(events: Vec<SessionEvent>) -> Self {
        Self {
            control: RecordingControl::default(),
            fail_after_events: false,
            events: Mutex::new(events.into()),
            results: Mutex::new(Vec::new()),
            plan: Mutex::new(None),
        }
    }

    pub(crate) fn results(&self) -> Vec<(String, Value)> {
        self.results.lock().unwrap().clone()
    }

    pub(crate) fn connected_plan(&self) -> Option<String> {
        self.plan.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallControl for ScriptedTransport {
    async fn say(&self, text: &str) -> Result<()> {
        self.control.say(text).await
    }

    async fn hangup(&self) -> Result<()> {
        self.control.hangup().await
    }

    fn is_live(&self) -> bool {
        self.control.is_live()
    }
}

#[async_trait]
impl SessionTransport for ScriptedTransport {
    async fn connect(&self, plan: &SessionPlan) -> Result<()> {
        *self.plan.lock().unwrap() = Some(serde_json::to_string(plan)?);
        Ok(())
    }

    async fn next_event(&self) -> Result<Option<SessionEvent>> {
        let next = self.events.lock().unwrap().pop_front();
        if next.is_none() && self.fail_after_events {
            return Err(CallbotError::Session("connection reset".to_string()));
        }
        Ok(next)
    }

    async fn send_tool_result(&self, call_id: &str, output: &Value) -> Result<()> {
        self.results
            .lock()
            .unwrap()
            .push((call_id.to_string(), output.clone()));
        Ok(())
    }
}
