//! Outbound phone calls bridged into the meeting.
//!
//! The telephony provider dials the destination and, once answered, runs
//! markup that dials the meeting's SIP endpoint, so the callee ends up in the
//! same room as the agent.

mod twilio;
mod twiml;

pub use twilio::TwilioClient;
pub use twiml::SipBridge;

use crate::config::env::{
    TO_PHONE_NUMBER, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER, TWILIO_SID, VIDEOSDK_MEETING_ID,
    VIDEOSDK_SIP_PASSWORD, VIDEOSDK_SIP_USERNAME,
};
use crate::error::{CallbotError, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

/// Environment keys the webhook server needs to render bridge markup.
pub const BRIDGE_ENV_KEYS: &[&str] = &[VIDEOSDK_MEETING_ID, VIDEOSDK_SIP_USERNAME, VIDEOSDK_SIP_PASSWORD];

/// Environment keys for placing a call. `TO_PHONE_NUMBER` is only needed when no destination is given.
pub fn required_env_keys(with_destination: bool) -> Vec<&'static str> {
    let mut keys = vec![
        TWILIO_SID,
        TWILIO_AUTH_TOKEN,
        TWILIO_PHONE_NUMBER,
        VIDEOSDK_MEETING_ID,
        VIDEOSDK_SIP_USERNAME,
        VIDEOSDK_SIP_PASSWORD,
    ];
    if !with_destination {
        keys.push(TO_PHONE_NUMBER);
    }
    keys
}

fn e164() -> &'static Regex {
    static E164: OnceLock<Regex> = OnceLock::new();
    E164.get_or_init(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("Invalid regex"))
}

/// Check that a number is in E.164 form, e.g. `+15551234567`.
pub fn validate_e164(number: &str) -> Result<()> {
    if e164().is_match(number) {
        Ok(())
    } else {
        Err(CallbotError::InvalidInput(format!(
            "Phone number must be in E.164 format (e.g., +1234567890), got {:?}",
            number
        )))
    }
}

/// Places calls that are bridged into one meeting.
pub struct OutboundCaller {
    twilio: TwilioClient,
    bridge: SipBridge,
}

impl OutboundCaller {
    pub fn new(twilio: TwilioClient, bridge: SipBridge) -> Self {
        Self { twilio, bridge }
    }

    /// Call `to` and bridge it to the meeting. Returns the provider's call sid.
    pub async fn call(&self, to: &str) -> Result<String> {
        validate_e164(to)?;

        let sid = self.twilio.create_call(to, &self.bridge.markup()).await?;
        info!("Call {} placed, bridging to meeting {}", sid, self.bridge.meeting_id);
        Ok(sid)
    }
}
