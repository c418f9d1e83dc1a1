//! Command executor - sandboxed external process execution
//!
//! Commands run with the workspace root as working directory, a hard
//! timeout, and no shell interpretation: the command line is split into
//! words and the arguments are passed literally.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Hard timeout for external commands
pub const COMMAND_TIMEOUT_SECS: u64 = 60;

/// Executable-name prefixes permitted in safe mode
pub const SAFE_COMMAND_PREFIXES: &[&str] = &[
    "python", "python3", "pip", "pip3", "node", "npm", "npx", "cargo", "rustc", "ls", "dir",
    "cat", "type", "echo", "git", "pytest", "test",
];

/// Outcome of a command execution. Every failure mode is reported through
/// this value; `run` itself never errors.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
            exit_code: None,
        }
    }
}

/// Executes external commands inside the workspace
pub struct CommandExecutor {
    working_dir: PathBuf,
}

impl CommandExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Run a command line with the default 60 second timeout.
    pub async fn run(&self, command: &str, safe_mode: bool) -> CommandOutcome {
        self.run_with_timeout(command, safe_mode, Duration::from_secs(COMMAND_TIMEOUT_SECS))
            .await
    }

    /// Run a command line with an explicit timeout.
    pub async fn run_with_timeout(
        &self,
        command: &str,
        safe_mode: bool,
        limit: Duration,
    ) -> CommandOutcome {
        // Shell-word splitting with a naive whitespace fallback for lines
        // shlex cannot parse (e.g. an unterminated quote)
        let parts = shlex::split(command)
            .unwrap_or_else(|| command.split_whitespace().map(String::from).collect());

        if parts.is_empty() {
            return CommandOutcome::failure("Empty command");
        }
        let base_command = &parts[0];

        if safe_mode
            && !SAFE_COMMAND_PREFIXES
                .iter()
                .any(|prefix| base_command.starts_with(prefix))
        {
            return CommandOutcome::failure(format!(
                "Command '{}' not allowed in safe mode. Allowed: {}",
                base_command,
                SAFE_COMMAND_PREFIXES.join(", ")
            ));
        }

        tracing::debug!(command = %command, "Running command");

        let result = timeout(
            limit,
            Command::new(base_command)
                .args(&parts[1..])
                .current_dir(&self.working_dir)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);

                let mut text = stdout.into_owned();
                if !stderr.is_empty() {
                    text.push_str(&format!("\n[stderr]: {}", stderr));
                }
                if text.is_empty() {
                    text = "(no output)".to_string();
                }

                let exit_code = output.status.code();
                if output.status.success() {
                    CommandOutcome {
                        success: true,
                        output: text,
                        error: None,
                        exit_code,
                    }
                } else {
                    CommandOutcome {
                        success: false,
                        output: text,
                        error: Some(format!(
                            "Command exited with code {}",
                            exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
                        )),
                        exit_code,
                    }
                }
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                CommandOutcome::failure(format!("Command not found: {}", base_command))
            }
            Ok(Err(e)) => CommandOutcome::failure(format!("Error running command: {}", e)),
            // Dropping the future kills the child (kill_on_drop)
            Err(_) => CommandOutcome::failure(format!(
                "Command timed out after {} seconds",
                limit.as_secs()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn executor(dir: &std::path::Path) -> CommandExecutor {
        CommandExecutor::new(dir)
    }

    #[tokio::test]
    async fn test_empty_command() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run("   ", false).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Empty command"));
    }

    #[tokio::test]
    async fn test_echo_success() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run("echo hello world", false).await;
        assert!(outcome.success);
        assert_eq!(outcome.output.trim(), "hello world");
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_quoted_arguments_pass_literally() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run(r#"echo "two words""#, false).await;
        assert!(outcome.success);
        assert_eq!(outcome.output.trim(), "two words");
    }

    #[tokio::test]
    async fn test_safe_mode_refuses_unlisted_command() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run("rm -rf /", true).await;
        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.contains("not allowed in safe mode"));
        // The allow-list is enumerated in the error
        assert!(error.contains("python"));
    }

    #[tokio::test]
    async fn test_safe_mode_permits_allowed_prefix() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run("echo safe", true).await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_command_not_found() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path())
            .run("definitely-not-a-real-binary-xyz", false)
            .await;
        assert!(!outcome.success);
        assert!(outcome
            .error
            .unwrap()
            .starts_with("Command not found: definitely-not-a-real-binary-xyz"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_code() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path()).run(r#"sh -c "exit 3""#, false).await;
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.error.as_deref(), Some("Command exited with code 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stderr_appended_under_marker() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path())
            .run(r#"sh -c "echo out; echo err >&2""#, false)
            .await;
        assert!(outcome.success);
        assert!(outcome.output.contains("out"));
        assert!(outcome.output.contains("[stderr]: err"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_terminates_command() {
        let dir = tempdir().unwrap();
        let outcome = executor(dir.path())
            .run_with_timeout("sleep 5", false, Duration::from_millis(200))
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_runs_in_workspace_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();
        let outcome = executor(dir.path()).run("ls", false).await;
        assert!(outcome.success);
        assert!(outcome.output.contains("marker.txt"));
    }
}
