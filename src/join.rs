//! Install-time execution: the join itself and the queued follow-ups.
//!
//! The join runs against the target sysroot after the filesystem is
//! installed. Failures are logged, never raised; a failed join means the
//! machine simply comes up outside the realm.

use std::path::Path;

use log::{error, info};

use crate::directive::{REALM_TOOL, RealmDirective};
use crate::runner::ToolRunner;

impl RealmDirective {
    /// Password flags for the join invocation. `--no-password` is the
    /// default; an explicit `--no-password` or `--one-time-password` among
    /// the join arguments wins.
    fn password_args(&self) -> Vec<String> {
        let explicit = self.join_args.iter().any(|arg| {
            arg.starts_with("--no-password") || arg.starts_with("--one-time-password")
        });
        if explicit {
            Vec::new()
        } else {
            vec!["--no-password".to_string()]
        }
    }

    /// Run `realm join` against the target sysroot.
    ///
    /// Returns true only when the tool launched and exited zero. A launch
    /// failure is terminal for the attempt, same as a non-zero exit.
    pub fn run_join(&self, runner: &mut dyn ToolRunner, sysroot: &Path) -> bool {
        let mut args: Vec<String> = vec![
            "join".to_string(),
            "--install".to_string(),
            sysroot.display().to_string(),
            "--verbose".to_string(),
        ];
        args.extend(self.password_args());
        args.extend(self.join_args.iter().cloned());

        match runner.run(REALM_TOOL, &args) {
            Err(err) => {
                error!("Error running {} {}: {}", REALM_TOOL, args.join(" "), err);
                false
            }
            Ok(code) if code != 0 => {
                error!(
                    "Command failure: {} {}: {}",
                    REALM_TOOL,
                    args.join(" "),
                    code
                );
                false
            }
            Ok(_) => {
                info!("Joined realm {}", self.join_realm().unwrap_or_default());
                true
            }
        }
    }

    /// Run each queued `permit`/`deny` in enqueue order. Each follow-up is
    /// independent: a failure is logged and the remaining ones still run.
    pub fn run_follow_ups(&self, runner: &mut dyn ToolRunner, sysroot: &Path) {
        for follow_up in &self.follow_ups {
            let mut args: Vec<String> = vec![
                follow_up.command.to_string(),
                "--install".to_string(),
                sysroot.display().to_string(),
                "--verbose".to_string(),
            ];
            args.extend(follow_up.args.iter().cloned());

            match runner.run(REALM_TOOL, &args) {
                Err(err) => {
                    error!("Error running {} {}: {}", REALM_TOOL, args.join(" "), err);
                }
                Ok(code) if code != 0 => {
                    error!(
                        "Command failure: {} {}: {}",
                        REALM_TOOL,
                        args.join(" "),
                        code
                    );
                }
                Ok(_) => info!("Ran {} {}", REALM_TOOL, args.join(" ")),
            }
        }
    }
}
