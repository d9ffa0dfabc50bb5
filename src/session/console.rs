//! Line-oriented transport for rehearsing a call locally.
//!
//! Agent utterances are written as `agent> <text>`. Each input line is either
//! a JSON [`SessionEvent`] (`{"type":"tool_call",...}`) or, if it does not
//! start with `{`, something the caller said.

use super::{CallControl, SessionEvent, SessionPlan, SessionTransport};
use crate::error::{CallbotError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;
use tracing::warn;

pub struct ConsoleTransport<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
    live: AtomicBool,
}

impl ConsoleTransport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            live: AtomicBool::new(true),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    async fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(format!("{}\n", line).as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> CallControl for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn say(&self, text: &str) -> Result<()> {
        if !self.is_live() {
            return Err(CallbotError::Session("cannot speak on an ended call".to_string()));
        }
        self.write_line(&format!("agent> {}", text)).await
    }

    async fn hangup(&self) -> Result<()> {
        if self.live.swap(false, Ordering::SeqCst) {
            self.write_line("-- call ended --").await?;
        }
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R, W> SessionTransport for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn connect(&self, plan: &SessionPlan) -> Result<()> {
        self.write_line(&format!(
            "-- {} joined meeting {} ({} {}) --",
            plan.context.name,
            plan.context.meeting_id,
            plan.pipeline.model.provider(),
            plan.pipeline.model.model_name()
        ))
        .await
    }

    async fn next_event(&self) -> Result<Option<SessionEvent>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with('{') {
                match serde_json::from_str::<SessionEvent>(trimmed) {
                    Ok(event) => return Ok(Some(event)),
                    Err(e) => {
                        warn!("Ignoring malformed event: {}", e);
                        continue;
                    }
                }
            }

            return Ok(Some(SessionEvent::Transcript {
                role: "caller".to_string(),
                text: trimmed.to_string(),
            }));
        }
    }

    async fn send_tool_result(&self, call_id: &str, output: &Value) -> Result<()> {
        self.write_line(&format!("tool[{}]> {}", call_id, output)).await
    }
}
