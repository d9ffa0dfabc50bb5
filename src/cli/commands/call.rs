//! Call command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::env::TO_PHONE_NUMBER;
use crate::config::Settings;
use crate::error::CallbotError;
use crate::telephony::{OutboundCaller, SipBridge, TwilioClient};
use anyhow::Result;
use tracing::error;

/// Run the call command.
pub async fn run_call(to: Option<String>, settings: Settings) -> Result<()> {
    let env = match preflight::check(&Operation::Call { destination: to }) {
        Ok(env) => env,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'callbot doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let to = env.get(TO_PHONE_NUMBER)?.to_string();

    let caller = OutboundCaller::new(
        TwilioClient::from_env(&env, &settings.telephony.api_base)?,
        SipBridge::from_env(&env, &settings.telephony.sip_domain)?,
    );

    let spinner = Output::spinner(&format!("Calling {}...", to));

    match caller.call(&to).await {
        Ok(sid) => {
            spinner.finish_and_clear();
            Output::success("Call placed.");
            Output::kv("Call SID", &sid);
        }
        Err(e @ CallbotError::InvalidInput(_)) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            Output::info("Numbers must be in E.164 form, e.g. +15551234567.");
            return Err(e.into());
        }
        Err(e) => {
            spinner.finish_and_clear();
            error!("Call failed: {}", e);
            Output::error(&format!("Call failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
