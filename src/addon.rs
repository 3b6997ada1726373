//! Add-on lifecycle contract.
//!
//! The installer framework drives an add-on through three callbacks: one
//! per section line while the kickstart is read, one before filesystem
//! installation, and one after. The realm directive implements all three.

use std::path::Path;

use crate::directive::RealmDirective;
use crate::error::Result;
use crate::packages::PackageSelection;
use crate::runner::ToolRunner;

/// Accounts created by the installer's user subsystem, handed to every
/// add-on at execute time. This add-on does not consult it.
#[derive(Debug, Default, Clone)]
pub struct CreatedUsers {
    pub accounts: Vec<String>,
}

/// Lifecycle contract of a kickstart `%addon` section handler.
pub trait AddonSection {
    /// Called with every line of the add-on's section body. Parse errors
    /// invalidate the whole kickstart and abort script parsing.
    fn handle_line(&mut self, line: &str) -> Result<()>;

    /// Called once before filesystem installation; may append to the
    /// install-time package list. Must not fail the installation.
    fn setup(&mut self, runner: &mut dyn ToolRunner, packages: &mut PackageSelection);

    /// Called once after filesystem installation, with the target sysroot
    /// and the user-creation context. Must not fail the installation.
    fn execute(&self, runner: &mut dyn ToolRunner, sysroot: &Path, users: &CreatedUsers);
}

impl AddonSection for RealmDirective {
    fn handle_line(&mut self, line: &str) -> Result<()> {
        RealmDirective::handle_line(self, line)
    }

    fn setup(&mut self, runner: &mut dyn ToolRunner, packages: &mut PackageSelection) {
        self.setup_packages(runner, packages);
    }

    fn execute(&self, runner: &mut dyn ToolRunner, sysroot: &Path, _users: &CreatedUsers) {
        // Empty discovered realm covers both "no join requested" and
        // "discovery failed"; either way there is nothing to execute.
        if self.discovered_realm().is_empty() {
            return;
        }
        if self.run_join(runner, sysroot) {
            self.run_follow_ups(runner, sysroot);
        }
    }
}
