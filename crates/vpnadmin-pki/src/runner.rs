//! External toolchain invocation.
//!
//! easy-rsa writes ordinary progress output to stderr and offers no
//! reliable exit-code contract: some subcommands exit non-zero after a
//! semantically successful database update. Success is therefore judged
//! by [`classify`], a pure function over the combined output and the raw
//! exit status.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, warn};

use crate::error::PkiError;

/// Substrings whose presence in the combined output marks an invocation
/// as failed, matched case-insensitively.
pub const ERROR_KEYWORDS: [&str; 6] = ["error", "failed", "unable to", "cannot", "bad", "invalid"];

/// Phrases emitted during normal successful ledger updates that happen to
/// contain failure-adjacent words. Their presence overrides both the
/// keyword scan and a non-zero exit status.
pub const BENIGN_PHRASES: [&str; 2] = ["Database updated", "Write out database"];

/// Verdict of the output classification heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

/// Classify one toolchain invocation from its combined output and exit
/// status.
///
/// The benign-phrase allowlist takes precedence: an output containing one
/// is a success even when the process exited non-zero or the output also
/// matches an error keyword.
pub fn classify(output: &str, exit_ok: bool) -> Verdict {
    if BENIGN_PHRASES.iter().any(|phrase| output.contains(phrase)) {
        return Verdict::Success;
    }
    if !exit_ok {
        return Verdict::Failure;
    }
    let lower = output.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Verdict::Failure
    } else {
        Verdict::Success
    }
}

/// Result of a successful toolchain invocation.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// stdout followed by stderr.
    pub output: String,
}

/// Executes easy-rsa subcommands.
///
/// The working directory is threaded explicitly through every call;
/// process-global state is never mutated, so concurrent invocations for
/// different purposes cannot corrupt each other's path resolution.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    /// Create a runner with the default 60s per-invocation timeout.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }

    /// Override the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one command to completion and classify its output.
    ///
    /// stdout and stderr are concatenated before classification.
    pub async fn run(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
        extra_env: &[(&str, &str)],
    ) -> Result<CommandResult, PkiError> {
        debug!(
            program,
            ?args,
            working_dir = %working_dir.display(),
            "Invoking toolchain command"
        );

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in extra_env {
            cmd.env(key, value);
        }

        let raw = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                error!(program, error = %e, "Failed to spawn toolchain process");
                return Err(PkiError::Spawn(e));
            }
            Err(_) => {
                error!(program, timeout_secs = self.timeout.as_secs(), "Toolchain command timed out");
                return Err(PkiError::Timeout(self.timeout.as_secs()));
            }
        };

        let mut output = String::from_utf8_lossy(&raw.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&raw.stderr));

        match classify(&output, raw.status.success()) {
            Verdict::Success => Ok(CommandResult { output }),
            Verdict::Failure => {
                warn!(program, output = %output, "Toolchain command reported failure");
                Err(PkiError::ToolchainFailure(output))
            }
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_succeeds() {
        assert_eq!(classify("Keypair and certificate request completed", true), Verdict::Success);
    }

    #[test]
    fn test_keyword_is_failure() {
        assert_eq!(classify("Easy-RSA error: unknown option", true), Verdict::Failure);
        assert_eq!(classify("Unable to revoke as the input file is not a valid certificate", true), Verdict::Failure);
        assert_eq!(classify("CANNOT OPEN FILE", true), Verdict::Failure);
    }

    #[test]
    fn test_benign_phrase_suppresses_keyword() {
        // "updated" output also mentions the word "database" alongside
        // "error"-adjacent wording during normal operation
        let out = "Revoking Certificate ABC.\nData Base Updated\nfailed to close unused file\nDatabase updated";
        assert_eq!(classify(out, true), Verdict::Success);
    }

    #[test]
    fn test_benign_phrase_overrides_nonzero_exit() {
        assert_eq!(classify("Write out database with 1 new entries", false), Verdict::Success);
        assert_eq!(classify("Database updated", false), Verdict::Success);
    }

    #[test]
    fn test_nonzero_exit_without_benign_phrase_fails() {
        assert_eq!(classify("some output", false), Verdict::Failure);
        assert_eq!(classify("", false), Verdict::Failure);
    }

    #[tokio::test]
    async fn test_run_captures_both_streams() {
        let runner = CommandRunner::new();
        let result = runner
            .run(
                "sh",
                &["-c", "echo out; echo progress >&2"],
                Path::new("."),
                &[],
            )
            .await
            .unwrap();
        assert!(result.output.contains("out"));
        assert!(result.output.contains("progress"));
    }

    #[tokio::test]
    async fn test_run_surfaces_toolchain_failure() {
        let runner = CommandRunner::new();
        let err = runner
            .run("sh", &["-c", "echo 'error: boom'"], Path::new("."), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PkiError::ToolchainFailure(out) if out.contains("boom")));
    }

    #[tokio::test]
    async fn test_run_spawn_failure() {
        let runner = CommandRunner::new();
        let err = runner
            .run("/nonexistent/easyrsa", &[], Path::new("."), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PkiError::Spawn(_)));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = CommandRunner::new().with_timeout(Duration::from_millis(50));
        let err = runner
            .run("sh", &["-c", "sleep 5"], Path::new("."), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, PkiError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_run_passes_extra_env_and_working_dir() {
        let runner = CommandRunner::new();
        let result = runner
            .run(
                "sh",
                &["-c", "printf '%s' \"$CRL_TEST_VAR\"; pwd"],
                Path::new("/tmp"),
                &[("CRL_TEST_VAR", "3650")],
            )
            .await
            .unwrap();
        assert!(result.output.contains("3650"));
        assert!(result.output.contains("/tmp"));
    }
}
