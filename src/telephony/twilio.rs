//! Twilio Programmable Voice REST client.

use crate::config::env::{TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER, TWILIO_SID};
use crate::config::{Secret, ValidatedEnv};
use crate::error::{CallbotError, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Deserialize)]
struct CallResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResource {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: Option<String>,
}

/// Places calls from one account and caller number.
#[derive(Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: Secret,
    from: String,
}

impl TwilioClient {
    pub fn new(api_base: &str, account_sid: &str, auth_token: Secret, from: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token,
            from: from.to_string(),
        }
    }

    pub fn from_env(env: &ValidatedEnv, api_base: &str) -> Result<Self> {
        Ok(Self::new(
            api_base,
            env.get(TWILIO_SID)?,
            env.secret(TWILIO_AUTH_TOKEN)?,
            env.get(TWILIO_PHONE_NUMBER)?,
        ))
    }

    /// Create a call to `to` that runs the given markup once answered. Returns the call sid.
    #[instrument(skip(self, twiml))]
    pub async fn create_call(&self, to: &str, twiml: &str) -> Result<String> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base, self.account_sid
        );

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose()))
            .form(&[("To", to), ("From", self.from.as_str()), ("Twiml", twiml)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResource>(&body) {
                Ok(ErrorResource {
                    code: Some(code),
                    message: Some(message),
                }) => format!("{} (code {})", message, code),
                Ok(ErrorResource {
                    message: Some(message),
                    ..
                }) => message,
                _ => status.canonical_reason().unwrap_or("unexpected status").to_string(),
            };
            return Err(CallbotError::Upstream {
                service: "twilio",
                status: status.as_u16(),
                message,
            });
        }

        let call: CallResource = response.json().await?;
        debug!(
            "Call {} created with status {}",
            call.sid,
            call.status.as_deref().unwrap_or("unknown")
        );
        Ok(call.sid)
    }
}
