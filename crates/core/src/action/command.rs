//! External program action.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use super::error::ActionError;
use super::traits::Action;
use crate::record::Record;

/// Configuration for [`CommandAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Program to run for each record.
    pub program: String,

    /// Fixed arguments passed before the record's fields.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Runs an external program once per record.
///
/// The program receives the configured arguments followed by the record's
/// fields. A zero exit status is a success carrying the trimmed stdout; any
/// other status is a failure carrying the trimmed stderr.
#[derive(Debug, Clone)]
pub struct CommandAction {
    config: CommandConfig,
}

impl CommandAction {
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Action for CommandAction {
    fn name(&self) -> &str {
        &self.config.program
    }

    async fn execute(&self, record: &Record) -> Result<String, ActionError> {
        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .args(record.fields())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ActionError::new(format!("failed to run {}: {}", self.config.program, e))
            })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            return Err(ActionError::new(stderr));
        }

        match output.status.code() {
            Some(code) => Err(ActionError::new(format!("exited with status {}", code))),
            None => Err(ActionError::new("terminated by signal")),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandAction {
        CommandAction::new(CommandConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
        })
    }

    fn record(fields: &[&str]) -> Record {
        Record::new(1, fields.iter().map(|f| f.to_string()).collect())
    }

    #[tokio::test]
    async fn test_success_returns_stdout() {
        let action = sh("echo \"$1-$2\"");
        let message = action.execute(&record(&["a", "b"])).await.unwrap();
        assert_eq!(message, "a-b");
    }

    #[tokio::test]
    async fn test_failure_returns_stderr() {
        let action = sh("echo \"bad $1\" >&2; exit 3");
        let err = action.execute(&record(&["x"])).await.unwrap_err();
        assert_eq!(err.message(), "bad x");
    }

    #[tokio::test]
    async fn test_failure_without_stderr_reports_status() {
        let action = sh("exit 7");
        let err = action.execute(&record(&["x"])).await.unwrap_err();
        assert_eq!(err.message(), "exited with status 7");
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let action = CommandAction::new(CommandConfig {
            program: "/nonexistent/batchflow-action".to_string(),
            args: vec![],
        });
        let err = action.execute(&record(&["x"])).await.unwrap_err();
        assert!(err.message().starts_with("failed to run /nonexistent/batchflow-action"));
    }

    #[test]
    fn test_config_args_default_empty() {
        let config: CommandConfig = toml::from_str(r#"program = "curl""#).unwrap();
        assert_eq!(config.program, "curl");
        assert!(config.args.is_empty());
    }
}
