//! Doctor command - verify environment and configuration.

use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::env::is_secret_key;
use crate::config::{EnvSnapshot, Settings};
use console::style;
use std::path::PathBuf;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("callbot doctor");
    println!();
    println!("Checking environment and configuration...\n");

    let groups = [
        (
            format!("Agent session ({})", settings.realtime.provider),
            "callbot agent",
            Operation::Agent(settings.realtime.provider),
        ),
        (
            "Outbound calls".to_string(),
            "callbot call",
            Operation::Call { destination: None },
        ),
        ("Webhook server".to_string(), "callbot serve", Operation::Serve),
    ];

    let mut checks = Vec::new();

    for (title, command, operation) in &groups {
        println!("{}", style(title).bold());
        let snapshot = EnvSnapshot::capture(&operation.required_keys());
        let group = check_keys(&snapshot, command);
        for check in &group {
            check.print();
        }
        checks.extend(group);
        println!();
    }

    println!("{}", style("Configuration").bold());
    let config_checks = [check_dotenv(), check_config_file(config_path)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using callbot.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! callbot is ready to use.");
    }

    Ok(())
}

/// One result per required key. Values are never printed.
fn check_keys(snapshot: &EnvSnapshot, command: &str) -> Vec<CheckResult> {
    let missing = snapshot.missing();
    snapshot
        .keys()
        .map(|key| {
            if missing.iter().any(|m| m == key) {
                CheckResult::warning(
                    key,
                    "not set",
                    &format!("Needed by '{}'. Set with: export {}=... (or add it to .env)", command, key),
                )
            } else if is_secret_key(key) {
                CheckResult::ok(key, "set (redacted)")
            } else {
                CheckResult::ok(key, "set")
            }
        })
        .collect()
}

/// Check for a `.env` file in the working directory.
fn check_dotenv() -> CheckResult {
    let path = PathBuf::from(".env");
    if path.exists() {
        CheckResult::ok(".env", "found in working directory")
    } else {
        CheckResult::warning(
            ".env",
            "not found",
            "Variables must come from the process environment",
        )
    }
}

/// Check if config file exists and parses.
fn check_config_file(config_path: Option<&str>) -> CheckResult {
    let path = config_path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);

    if !path.exists() {
        return CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override models, endpoints or the script", path.display()),
        );
    }

    match Settings::load_from(Some(&path)) {
        Ok(_) => CheckResult::ok("Config file", &format!("{}", path.display())),
        Err(e) => CheckResult::error(
            "Config file",
            &format!("{} is invalid: {}", path.display(), e),
            "Fix the file or print the defaults with: callbot config show",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::{TWILIO_AUTH_TOKEN, TWILIO_SID};

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_keys_never_prints_values() {
        let snapshot = EnvSnapshot::from_pairs([
            (TWILIO_SID, Some("AC-visible-id")),
            (TWILIO_AUTH_TOKEN, Some("hidden-token")),
            ("TO_PHONE_NUMBER", None),
        ]);
        let results = check_keys(&snapshot, "callbot call");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, CheckStatus::Ok);
        assert_eq!(results[1].message, "set (redacted)");
        assert_eq!(results[2].status, CheckStatus::Warning);
        assert!(results[2].hint.as_deref().unwrap().contains("callbot call"));
        assert!(results.iter().all(|r| !r.message.contains("hidden-token") && !r.message.contains("AC-visible-id")));
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[realtime]\nprovider = \"azure\"\n").unwrap();

        let result = check_config_file(path.to_str());
        assert_eq!(result.status, CheckStatus::Error);
    }
}
