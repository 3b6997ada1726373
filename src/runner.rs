//! External tool invocation.
//!
//! Every phase talks to the realm tool through `ToolRunner`, a narrow seam
//! with the two call shapes the installer framework offers: run-and-redirect
//! for the join and its follow-ups, capture-stdout for discovery. The
//! installer wires in `SystemRunner`; tests substitute a recording fake that
//! returns canned exit codes and output without launching anything.

use std::io;
use std::process::{Command, Stdio};

use log::info;
use thiserror::Error;

/// Errors from launching or waiting on the external tool.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The process could not be launched at all.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited non-zero (capture mode with `fatal` set).
    #[error("'{command}' exited with code {code}: {stderr}")]
    Exit {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// The two invocation modes of the installer's process facility.
pub trait ToolRunner {
    /// Run the tool, streaming its output through to the installer's own
    /// console and log streams. Returns the exit code, -1 when the process
    /// was terminated by a signal.
    fn run(&mut self, program: &str, args: &[String]) -> Result<i32, RunnerError>;

    /// Run the tool and capture its stdout as text. With `fatal` set, a
    /// non-zero exit is reported as `RunnerError::Exit` instead of
    /// returning the captured text.
    fn capture(&mut self, program: &str, args: &[String], fatal: bool)
    -> Result<String, RunnerError>;
}

fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Blocking runner on top of `std::process::Command`.
///
/// Invocations block until the subprocess exits; no timeout is applied.
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<i32, RunnerError> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RunnerError::Launch {
                command: command_line(program, args),
                source,
            })?;
        Ok(status.code().unwrap_or(-1))
    }

    fn capture(
        &mut self,
        program: &str,
        args: &[String],
        fatal: bool,
    ) -> Result<String, RunnerError> {
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| RunnerError::Launch {
                command: command_line(program, args),
                source,
            })?;

        if fatal && !output.status.success() {
            return Err(RunnerError::Exit {
                command: command_line(program, args),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Substitutes one program name before delegating, so a configuration can
/// point the `realm` invocations at a stand-in binary.
pub struct ProgramOverride<R> {
    inner: R,
    from: String,
    to: String,
}

impl<R> ProgramOverride<R> {
    pub fn new(inner: R, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            inner,
            from: from.into(),
            to: to.into(),
        }
    }

    fn resolve<'a>(&'a self, program: &'a str) -> &'a str {
        if program == self.from {
            &self.to
        } else {
            program
        }
    }

    /// Consume the override and return the wrapped runner.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ToolRunner> ToolRunner for ProgramOverride<R> {
    fn run(&mut self, program: &str, args: &[String]) -> Result<i32, RunnerError> {
        let program = self.resolve(program).to_string();
        self.inner.run(&program, args)
    }

    fn capture(
        &mut self,
        program: &str,
        args: &[String],
        fatal: bool,
    ) -> Result<String, RunnerError> {
        let program = self.resolve(program).to_string();
        self.inner.capture(&program, args, fatal)
    }
}

/// Runner that logs every would-be invocation without launching anything.
///
/// Used by the CLI's `--dry-run`: `run` reports success and `capture`
/// returns no output, so a dry run discovers nothing and joins nothing.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    invocations: Vec<String>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command lines that would have been executed, in order.
    pub fn invocations(&self) -> &[String] {
        &self.invocations
    }
}

impl ToolRunner for DryRunRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<i32, RunnerError> {
        let line = command_line(program, args);
        info!("dry-run: would execute {}", line);
        self.invocations.push(line);
        Ok(0)
    }

    fn capture(
        &mut self,
        program: &str,
        args: &[String],
        _fatal: bool,
    ) -> Result<String, RunnerError> {
        let line = command_line(program, args);
        info!("dry-run: would capture {}", line);
        self.invocations.push(line);
        Ok(String::new())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake shared by the unit tests.

    use std::collections::VecDeque;

    use super::{RunnerError, ToolRunner};

    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub calls: Vec<Vec<String>>,
        pub run_results: VecDeque<Result<i32, RunnerError>>,
        pub capture_results: VecDeque<Result<String, RunnerError>>,
    }

    impl RecordingRunner {
        pub fn launch_failure() -> RunnerError {
            RunnerError::Launch {
                command: "realm".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }
        }

        fn record(&mut self, program: &str, args: &[String]) {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().cloned());
            self.calls.push(call);
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&mut self, program: &str, args: &[String]) -> Result<i32, RunnerError> {
            self.record(program, args);
            self.run_results.pop_front().unwrap_or(Ok(0))
        }

        fn capture(
            &mut self,
            program: &str,
            args: &[String],
            _fatal: bool,
        ) -> Result<String, RunnerError> {
            self.record(program, args);
            self.capture_results
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}
