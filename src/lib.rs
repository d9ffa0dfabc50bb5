//! callbot - outbound voice-calling assistant
//!
//! Configures a realtime voice agent that joins a meeting room, and places
//! phone calls that are bridged into that room over SIP.
//!
//! # Overview
//!
//! callbot lets you:
//! - Validate every credential a run needs before touching the network
//! - Build the agent (instructions, scripted lines, tools) and its realtime session
//! - Answer the model's tool calls: weather, horoscope, end call
//! - Place an outbound call whose audio is bridged to the meeting's SIP endpoint
//! - Serve the bridge markup as a voice webhook
//!
//! # Architecture
//!
//! - `config` - Environment validation, settings and the agent script
//! - `agent` - The voice agent descriptor and its tools
//! - `session` - Realtime model, pipeline and the session run loop
//! - `telephony` - E.164 validation, SIP bridge markup and the Twilio client
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use callbot::config::{EnvSnapshot, Settings};
//! use callbot::telephony::{OutboundCaller, SipBridge, TwilioClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let env = EnvSnapshot::capture(&callbot::telephony::required_env_keys(true)).validate()?;
//!
//!     let caller = OutboundCaller::new(
//!         TwilioClient::from_env(&env, &settings.telephony.api_base)?,
//!         SipBridge::from_env(&env, &settings.telephony.sip_domain)?,
//!     );
//!     let sid = caller.call("+15551234567").await?;
//!     println!("Placed call {}", sid);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod telephony;

pub use error::{CallbotError, Result};
