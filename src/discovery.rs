//! Setup-phase discovery against the requested realm.
//!
//! Discovery is a dry-run query: it asks the realm tool which client
//! packages the realm requires, before anything is installed. It runs from
//! the live environment, so the install root is always `/` here, never the
//! target sysroot. Discovery failure is non-fatal: the installation
//! proceeds without a realm join and the failure is only visible in the
//! log.

use log::{error, info};

use crate::directive::{REALM_TOOL, REALM_TOOL_PACKAGE, RealmDirective};
use crate::packages::PackageSelection;
use crate::runner::ToolRunner;

/// Install root passed to discovery.
pub const DISCOVER_ROOT: &str = "/";

/// Key of the discovery output lines naming a package to install.
const REQUIRED_PACKAGE_KEY: &str = "required-package";

impl RealmDirective {
    /// Query the requested realm for the client software it requires.
    ///
    /// No-op when no `join` line was parsed. Launch failures and
    /// tool-reported errors are logged and leave the directive untouched.
    pub fn discover(&mut self, runner: &mut dyn ToolRunner) {
        let Some(realm) = self.join_realm().map(str::to_string) else {
            return;
        };

        let mut args: Vec<String> = vec![
            "discover".to_string(),
            "--verbose".to_string(),
            "--install".to_string(),
            DISCOVER_ROOT.to_string(),
        ];
        args.extend(self.discover_options().iter().cloned());
        args.push(realm);

        let output = match runner.capture(REALM_TOOL, &args, true) {
            Ok(output) => output,
            Err(err) => {
                error!("Error running {} {}: {}", REALM_TOOL, args.join(" "), err);
                return;
            }
        };

        self.apply_discovery_output(&output);
        if !self.discovered_realm.is_empty() {
            info!(
                "Realm {} needs packages {}",
                self.discovered_realm,
                self.required_packages.join(", ")
            );
        }
    }

    /// First output line is the realm name as the tool reports it; the
    /// remaining lines carry `name: value` details of which only
    /// `required-package` is interpreted. No lines, no state change.
    fn apply_discovery_output(&mut self, output: &str) {
        let mut lines = output.lines();
        let Some(first) = lines.next() else {
            return;
        };

        self.discovered_realm = first.trim().to_string();
        self.required_packages = vec![REALM_TOOL_PACKAGE.to_string()];
        for line in lines {
            if let Some((key, value)) = line.split_once(':') {
                if key.trim() == REQUIRED_PACKAGE_KEY {
                    self.required_packages.push(value.trim().to_string());
                }
            }
        }
    }

    /// Setup phase: run discovery, then append every package it reported
    /// that the install-time package list does not already carry.
    pub fn setup_packages(&mut self, runner: &mut dyn ToolRunner, packages: &mut PackageSelection) {
        self.discover(runner);
        for package in &self.required_packages {
            packages.add(package);
        }
    }
}
