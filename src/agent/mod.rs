//! The voice agent and the tools it can call mid-conversation.
//!
//! The agent itself is a declarative bundle: instructions, scripted lines and
//! tool definitions. The realtime engine decides when to call a tool; the
//! [`ToolContext`] carries it out and hands back a JSON record.

mod horoscope;
mod tools;
mod voice;
mod weather;

pub use horoscope::{horoscope_for, HoroscopeReport, FALLBACK_HOROSCOPE};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, ToolDefinition};
pub use voice::VoiceAgent;
pub use weather::{WeatherClient, WeatherReport};
