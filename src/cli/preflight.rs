//! Pre-flight checks before any network activity.
//!
//! Each operation declares the environment it needs. The whole set is
//! validated at once so a misconfigured run reports every missing key.

use crate::config::env::TO_PHONE_NUMBER;
use crate::config::{EnvSnapshot, RealtimeProvider, ValidatedEnv};
use crate::error::Result;
use crate::{session, telephony};

/// Requirements for different operations.
#[derive(Debug, Clone)]
pub enum Operation {
    /// The agent session needs a provider key and the meeting credentials.
    Agent(RealtimeProvider),
    /// Calls need telephony and SIP credentials, and a destination.
    Call { destination: Option<String> },
    /// The webhook server only needs the SIP bridge.
    Serve,
}

impl Operation {
    /// Environment keys this operation reads.
    pub fn required_keys(&self) -> Vec<&'static str> {
        match self {
            Operation::Agent(provider) => session::required_env_keys(*provider),
            Operation::Call { destination } => telephony::required_env_keys(destination.is_some()),
            Operation::Serve => telephony::BRIDGE_ENV_KEYS.to_vec(),
        }
    }

    /// Apply CLI values on top of what the environment provides.
    fn apply_overrides(&self, snapshot: EnvSnapshot) -> EnvSnapshot {
        match self {
            Operation::Call {
                destination: Some(to),
            } => snapshot.with_value(TO_PHONE_NUMBER, to.as_str()),
            _ => snapshot,
        }
    }
}

/// Read and validate the environment for the given operation.
pub fn check(operation: &Operation) -> Result<ValidatedEnv> {
    let snapshot = EnvSnapshot::capture(&operation.required_keys());
    operation.apply_overrides(snapshot).validate()
}

/// Validate an explicit snapshot for the given operation.
pub fn check_snapshot(operation: &Operation, snapshot: EnvSnapshot) -> Result<ValidatedEnv> {
    operation.apply_overrides(snapshot).validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::*;
    use crate::error::CallbotError;

    #[test]
    fn test_cli_destination_satisfies_to_phone_number() {
        let op = Operation::Call {
            destination: Some("+15551234567".to_string()),
        };
        let snapshot = EnvSnapshot::from_pairs(
            op.required_keys().into_iter().map(|k| (k, Some("value"))),
        );
        let env = check_snapshot(&op, snapshot).unwrap();
        assert_eq!(env.get(TO_PHONE_NUMBER).unwrap(), "+15551234567");
    }

    #[test]
    fn test_agent_reports_all_missing_keys() {
        let op = Operation::Agent(RealtimeProvider::OpenAi);
        let snapshot = EnvSnapshot::from_pairs(
            op.required_keys().into_iter().map(|k| (k, None::<String>)),
        );
        match check_snapshot(&op, snapshot) {
            Err(CallbotError::MissingEnv(keys)) => {
                assert_eq!(keys, vec![OPENAI_API_KEY, VIDEOSDK_MEETING_ID, VIDEOSDK_AUTH_TOKEN]);
            }
            other => panic!("Expected MissingEnv, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_serve_needs_only_bridge_keys() {
        assert_eq!(
            Operation::Serve.required_keys(),
            vec![VIDEOSDK_MEETING_ID, VIDEOSDK_SIP_USERNAME, VIDEOSDK_SIP_PASSWORD]
        );
    }
}
