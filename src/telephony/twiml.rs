//! Call-control markup bridging a phone call into the meeting over SIP.

use crate::config::env::{VIDEOSDK_MEETING_ID, VIDEOSDK_SIP_PASSWORD, VIDEOSDK_SIP_USERNAME};
use crate::config::{Secret, ValidatedEnv};
use crate::error::Result;

/// SIP endpoint of a meeting and the credentials to dial it with.
#[derive(Debug, Clone)]
pub struct SipBridge {
    pub meeting_id: String,
    pub username: String,
    pub password: Secret,
    pub domain: String,
}

impl SipBridge {
    pub fn from_env(env: &ValidatedEnv, domain: &str) -> Result<Self> {
        Ok(Self {
            meeting_id: env.get(VIDEOSDK_MEETING_ID)?.to_string(),
            username: env.get(VIDEOSDK_SIP_USERNAME)?.to_string(),
            password: env.secret(VIDEOSDK_SIP_PASSWORD)?,
            domain: domain.to_string(),
        })
    }

    /// `sip:<meeting_id>@<domain>`
    pub fn uri(&self) -> String {
        format!("sip:{}@{}", self.meeting_id, self.domain)
    }

    /// A `<Response>` that dials the meeting with the SIP credentials.
    pub fn markup(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Dial><Sip username="{}" password="{}">{}</Sip></Dial></Response>"#,
            escape_xml(&self.username),
            escape_xml(self.password.expose()),
            escape_xml(&self.uri())
        )
    }
}

/// Escape text for use in XML content or a double-quoted attribute.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
