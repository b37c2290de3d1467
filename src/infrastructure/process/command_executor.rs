use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command as TokioCommand};
use tokio::time::timeout;

/// Command executor errors
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    #[error("Command '{command}' failed with {}", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("Command '{command}' timed out after {timeout_seconds} seconds")]
    Timeout {
        command: String,
        timeout_seconds: u64,
    },

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// One external process invocation.
///
/// Arguments are passed straight to the program; nothing goes through a shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: Option<PathBuf>,
    /// Bytes written to stdin; `None` inherits the console
    pub input: Option<Vec<u8>>,
    /// Run through the runner's escalation program
    pub privileged: bool,
    pub timeout_seconds: Option<u64>,
    display: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Text used in logs and errors instead of the real argument list.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn display(&self) -> String {
        if let Some(display) = &self.display {
            return display.clone();
        }
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Outcome of a process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Display form of the command this result belongs to
    pub command: String,
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    pub execution_time_ms: u64,
}

impl ExecutionResult {
    pub fn new(command: impl Into<String>, exit_code: Option<i32>, execution_time_ms: u64) -> Self {
        Self {
            command: command.into(),
            exit_code,
            success: exit_code == Some(0),
            execution_time_ms,
        }
    }

    pub fn into_checked(self) -> Result<Self, CommandExecutorError> {
        if self.success {
            Ok(self)
        } else {
            Err(CommandExecutorError::CommandFailed {
                command: self.command,
                exit_code: self.exit_code,
            })
        }
    }
}

/// Seam between the procedures and the operating system.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one process with standard streams attached to the console.
    async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, CommandExecutorError>;

    /// Run `upstream | downstream`. The result belongs to the first
    /// process that failed, or to `downstream` when both succeed.
    async fn run_pipeline(
        &self,
        upstream: &CommandSpec,
        downstream: &CommandSpec,
    ) -> Result<ExecutionResult, CommandExecutorError>;

    /// [`CommandRunner::run`], treating a non-zero exit as an error.
    async fn run_checked(&self, spec: &CommandSpec) -> Result<ExecutionResult, CommandExecutorError> {
        self.run(spec).await?.into_checked()
    }

    /// [`CommandRunner::run_pipeline`], treating a non-zero exit as an error.
    async fn run_pipeline_checked(
        &self,
        upstream: &CommandSpec,
        downstream: &CommandSpec,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        self.run_pipeline(upstream, downstream).await?.into_checked()
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    escalation: Option<String>,
}

impl SystemCommandRunner {
    /// `escalation` prefixes privileged commands, e.g. `sudo`.
    pub fn new(escalation: Option<String>) -> Self {
        Self { escalation }
    }

    /// Privileged commands run directly, without any prefix.
    pub fn unprivileged() -> Self {
        Self { escalation: None }
    }

    fn build_command(&self, spec: &CommandSpec) -> Result<TokioCommand, CommandExecutorError> {
        if spec.program.trim().is_empty() {
            return Err(CommandExecutorError::InvalidCommand(
                "Command is empty".to_string(),
            ));
        }

        let mut cmd = match (&self.escalation, spec.privileged) {
            (Some(escalation), true) => {
                let mut cmd = TokioCommand::new(escalation);
                cmd.arg(&spec.program);
                cmd
            }
            _ => TokioCommand::new(&spec.program),
        };
        cmd.args(&spec.args);

        if let Some(working_dir) = &spec.working_directory {
            cmd.current_dir(working_dir);
        }

        cmd.stdin(if spec.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.kill_on_drop(true);
        Ok(cmd)
    }

    fn spawn(
        &self,
        mut cmd: TokioCommand,
        spec: &CommandSpec,
    ) -> Result<Child, CommandExecutorError> {
        tracing::debug!(command = %spec.display(), privileged = spec.privileged, "spawning");
        cmd.spawn().map_err(|source| CommandExecutorError::SpawnFailed {
            command: spec.display(),
            source,
        })
    }

    async fn feed_input(child: &mut Child, input: &[u8]) -> Result<(), CommandExecutorError> {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input).await?;
            stdin.shutdown().await?;
        }
        Ok(())
    }

    async fn wait_with_timeout(
        mut child: Child,
        spec: &CommandSpec,
    ) -> Result<Option<i32>, CommandExecutorError> {
        let Some(timeout_secs) = spec.timeout_seconds else {
            return Ok(child.wait().await?.code());
        };

        let waited = timeout(Duration::from_secs(timeout_secs), child.wait()).await;
        match waited {
            Ok(status) => Ok(status?.code()),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(command = %spec.display(), error = %e, "failed to kill timed out process");
                }
                Err(CommandExecutorError::Timeout {
                    command: spec.display(),
                    timeout_seconds: timeout_secs,
                })
            }
        }
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new(Some("sudo".to_string()))
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, CommandExecutorError> {
        let start_time = Instant::now();
        let cmd = self.build_command(spec)?;
        let mut child = self.spawn(cmd, spec)?;

        if let Some(input) = &spec.input {
            Self::feed_input(&mut child, input).await?;
        }

        let exit_code = Self::wait_with_timeout(child, spec).await?;
        let execution_time = start_time.elapsed().as_millis() as u64;

        Ok(ExecutionResult::new(spec.display(), exit_code, execution_time))
    }

    async fn run_pipeline(
        &self,
        upstream: &CommandSpec,
        downstream: &CommandSpec,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        let start_time = Instant::now();

        let mut up_cmd = self.build_command(upstream)?;
        up_cmd.stdout(Stdio::piped());
        let mut down_cmd = self.build_command(downstream)?;
        down_cmd.stdin(Stdio::piped());

        let mut up_child = self.spawn(up_cmd, upstream)?;
        let mut down_child = self.spawn(down_cmd, downstream)?;

        let mut up_out = up_child.stdout.take().ok_or_else(|| {
            CommandExecutorError::InvalidCommand(format!("{} has no stdout", upstream.display()))
        })?;
        let mut down_in = down_child.stdin.take().ok_or_else(|| {
            CommandExecutorError::InvalidCommand(format!("{} has no stdin", downstream.display()))
        })?;

        let copy = async move {
            let copied = tokio::io::copy(&mut up_out, &mut down_in).await;
            // closing stdin lets the downstream process see EOF
            drop(down_in);
            copied
        };

        let (copied, up_status, down_status) =
            tokio::join!(copy, up_child.wait(), down_child.wait());
        let up_code = up_status?.code();
        let down_code = down_status?.code();
        if let Err(e) = copied {
            tracing::debug!(error = %e, "pipe between processes closed early");
        }

        let execution_time = start_time.elapsed().as_millis() as u64;
        if up_code != Some(0) {
            return Ok(ExecutionResult::new(upstream.display(), up_code, execution_time));
        }
        Ok(ExecutionResult::new(downstream.display(), down_code, execution_time))
    }
}
