//! Shared test support: a recording runner that returns canned exit codes
//! and output without launching real processes.

use std::collections::VecDeque;

use realm_addon::{RunnerError, ToolRunner};

#[derive(Default)]
pub struct RecordingRunner {
    /// Every invocation, program first, in call order.
    pub calls: Vec<Vec<String>>,
    /// Canned results for `run`; exhausted queue means exit code 0.
    pub run_results: VecDeque<Result<i32, RunnerError>>,
    /// Canned results for `capture`; exhausted queue means empty output.
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
