//! CLI module for callbot.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::RealtimeProvider;
use clap::{Parser, Subcommand};

/// callbot - outbound voice-calling assistant
///
/// Rehearses the agent session, places outbound calls bridged into the
/// meeting over SIP, and serves the bridge markup for inbound calls.
#[derive(Parser, Debug)]
#[command(name = "callbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the voice agent session (rehearsed on the console)
    Agent {
        /// Print the session plan as JSON (secrets redacted) and exit
        #[arg(long)]
        plan: bool,

        /// Realtime provider (openai, gemini); overrides the config file
        #[arg(long)]
        provider: Option<RealtimeProvider>,
    },

    /// Place an outbound call bridged into the meeting
    Call {
        /// Destination number in E.164 format (defaults to TO_PHONE_NUMBER)
        to: Option<String>,
    },

    /// Serve the SIP bridge markup for the telephony provider's voice webhook
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Invoke one of the agent's tools locally
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },

    /// Check environment and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolAction {
    /// Current temperature at a location
    Weather {
        /// Latitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        latitude: String,
        /// Longitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        longitude: String,
    },

    /// Today's horoscope for a zodiac sign
    Horoscope {
        /// Zodiac sign, e.g. Aries
        sign: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
