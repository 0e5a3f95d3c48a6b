use std::path::PathBuf;

use tokio::process::Command;

use crate::error::RunError;

// Sanity check that our conditional compilation won't break with weird error messages.
#[cfg(all(windows, unix))]
compile_error!("Unix and Windows are exclusive!");
#[cfg(not(any(windows, unix)))]
compile_error!("Either Unix or Windows must be targeted!");

#[cfg(unix)]
pub const DEFAULT_SHELL: &str = "sh";
#[cfg(unix)]
pub const DEFAULT_SHELL_ARG: &str = "-c";
#[cfg(windows)]
pub const DEFAULT_SHELL: &str = "cmd";
#[cfg(windows)]
pub const DEFAULT_SHELL_ARG: &str = "/C";

/// The shell that interprets every received command line.
///
/// Constructed once at startup and shared by all requests.
/// The shell is not checked for existence, a broken one fails each request instead.
#[derive(Debug, Clone)]
pub struct Shell {
    program: String,
    arg: String,
    working_dir: Option<PathBuf>,
}

impl Shell {
    pub fn new(program: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arg: arg.into(),
            working_dir: None,
        }
    }

    /// Run commands in `dir` instead of the working directory of the server.
    #[must_use]
    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Builds `<program> <arg> <line>`, the line is passed on without any escaping.
    pub fn command(&self, line: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(&self.arg);
        // cmd.exe does its own parsing, quoting it like a regular argument breaks pipes.
        #[cfg(windows)]
        command.raw_arg(line);
        #[cfg(unix)]
        command.arg(line);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL, DEFAULT_SHELL_ARG)
    }
}

/// Runs the command to completion and returns its stdout if it exited with status zero.
///
/// A non-zero exit yields [`RunError::CommandFailed`] with the captured stderr,
/// anything the command printed to stdout before is dropped.
pub async fn process(id: u64, mut command: Command) -> Result<String, RunError> {
    // No timeout, this waits for as long as the command runs.
    let out = command.output().await.map_err(|e| {
        log::info!(id; "Failed: {e:?}");
        RunError::Spawn(e)
    })?;

    log::debug!(id; "Status: {}", out.status);
    log::debug!(id; "Stdout: {}", String::from_utf8_lossy(&out.stdout).trim());
    log::debug!(id; "Stderr: {}", String::from_utf8_lossy(&out.stderr).trim());

    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    } else {
        if !out.stdout.is_empty() {
            log::debug!(id, discarded = out.stdout.len(); "dropping stdout of failed command");
        }
        Err(RunError::CommandFailed {
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn echo_succeeds_with_stdout() {
        let output = process(0, Shell::default().command("echo hello")).await.unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stderr_is_dropped_on_success() {
        let output = process(0, Shell::default().command("echo out; echo err >&2"))
            .await
            .unwrap();
        assert_eq!(output, "out\n");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn non_zero_exit_returns_stderr_only() {
        let err = process(0, Shell::default().command("echo partial; echo broken >&2; exit 3"))
            .await
            .unwrap_err();
        let RunError::CommandFailed { stderr } = err else {
            panic!("expected a command failure, got {err:?}");
        };
        assert_eq!(stderr, "broken\n");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn exit_without_stderr_has_empty_error() {
        let err = process(0, Shell::default().command("exit 1")).await.unwrap_err();
        assert!(matches!(err, RunError::CommandFailed { ref stderr } if stderr.is_empty()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn shell_metacharacters_are_honored() {
        let output = process(0, Shell::default().command("printf 'b\\na\\n' | sort"))
            .await
            .unwrap();
        assert_eq!(output, "a\nb\n");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_shell_is_a_spawn_error() {
        let shell = Shell::new("/nonexistent/shell-shim-test-shell", "-c");
        let err = process(0, shell.command("echo hello")).await.unwrap_err();
        assert!(matches!(err, RunError::Spawn(_)));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runs_in_working_dir() {
        let dir = std::env::temp_dir().canonicalize().unwrap();
        let shell = Shell::default().with_working_dir(Some(dir.clone()));
        let output = process(0, shell.command("pwd -P")).await.unwrap();
        assert_eq!(output.trim_end(), dir.to_str().unwrap());
    }
}
