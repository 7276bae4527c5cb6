// file: src/executor.rs
// version: 1.0.1
// guid: b78db0e2-7a7a-4817-b40d-ac9d7caed213

//! External command execution
//!
//! One call spawns exactly one child and waits for it. A non-zero exit
//! status is returned to the caller, not raised; only a child that cannot
//! be launched at all is an error here.

use crate::error::{AzaError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Observer invoked with the full argv right before a child is spawned
pub type CommandHook<'a> = dyn Fn(&[String]) + Send + Sync + 'a;

/// Per-call execution options
#[derive(Clone, Copy)]
pub struct RunOptions<'a> {
    /// Pipe stdout/stderr back to the caller instead of the terminal
    pub capture_output: bool,
    /// Show a spinner with this label while the child runs
    pub progress_label: Option<&'a str>,
    pub hook: Option<&'a CommandHook<'a>>,
}

impl<'a> RunOptions<'a> {
    /// Capture output, with a spinner labelled `label`
    pub fn captured(label: &'a str) -> Self {
        Self {
            capture_output: true,
            progress_label: Some(label),
            hook: Some(&log_command),
        }
    }

    /// Hand the terminal to the child
    pub fn interactive() -> Self {
        Self {
            capture_output: false,
            progress_label: None,
            hook: Some(&log_command),
        }
    }

    pub fn with_hook(mut self, hook: Option<&'a CommandHook<'a>>) -> Self {
        self.hook = hook;
        self
    }
}

/// Default hook: log the command line being executed
pub fn log_command(argv: &[String]) {
    info!("Executing: {}", shell_words::join(argv));
}

/// Result of one child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Empty unless output was captured
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for running external programs
#[async_trait::async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `argv[0]` with the remaining elements as arguments
    async fn run(&self, argv: &[String], options: RunOptions<'_>) -> Result<CommandOutput>;
}

/// Executor backed by real child processes
///
/// Children run in the current directory and inherit the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(&self, argv: &[String], options: RunOptions<'_>) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| AzaError::launch("<empty>", "no command provided"))?;

        if let Some(hook) = options.hook {
            hook(argv);
        }

        let resolved = which::which(program).map_err(|e| AzaError::launch(program.clone(), e))?;
        debug!("Resolved {} to {}", program, resolved.display());

        let mut cmd = Command::new(&resolved);
        cmd.args(args).stdin(Stdio::inherit());

        let progress = options.progress_label.map(spinner);

        let result = if options.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            cmd.output().await.map(|output| CommandOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            cmd.status().await.map(|status| CommandOutput {
                exit_code: status.code().unwrap_or(-1),
                ..CommandOutput::default()
            })
        };

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let output = result.map_err(|e| AzaError::launch(program.clone(), e))?;
        debug!("{} exited with status {}", program, output.exit_code);
        Ok(output)
    }
}

fn spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Build an owned argv from string-like parts
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// Scripted executor for exercising callers without spawning anything
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One recorded invocation
    #[derive(Debug, Clone)]
    pub struct Call {
        pub argv: Vec<String>,
        pub captured: bool,
    }

    #[derive(Default)]
    pub struct FakeExecutor {
        calls: Mutex<Vec<Call>>,
        responses: Mutex<VecDeque<Result<CommandOutput>>>,
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a successful run printing `stdout`
        pub fn push_stdout(&self, stdout: &str) -> &Self {
            self.push(Ok(CommandOutput {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            }))
        }

        pub fn push_exit(&self, exit_code: i32) -> &Self {
            self.push(Ok(CommandOutput {
                exit_code,
                ..CommandOutput::default()
            }))
        }

        pub fn push(&self, response: Result<CommandOutput>) -> &Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Program plus first sub-command of every call, e.g. `az vm`
        pub fn commands(&self) -> Vec<String> {
            self.calls()
                .iter()
                .map(|c| c.argv.iter().take(2).cloned().collect::<Vec<_>>().join(" "))
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl CommandExecutor for FakeExecutor {
        async fn run(&self, argv: &[String], options: RunOptions<'_>) -> Result<CommandOutput> {
            if let Some(hook) = options.hook {
                hook(argv);
            }
            self.calls.lock().unwrap().push(Call {
                argv: argv.to_vec(),
                captured: options.capture_output,
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(CommandOutput::default()))
        }
    }
}
