//! Realm join add-on
//!
//! Handles the `realm` section of a declarative installation script:
//! parses `join`/`permit`/`deny` directives, discovers the packages a
//! realm requires before installation, and performs the join plus its
//! follow-up permission commands on the installed system by driving the
//! external realm-management tool.

pub mod addon;
pub mod cli;
pub mod config;
pub mod directive;
pub mod discovery;
pub mod error;
pub mod join;
pub mod packages;
pub mod runner;

// Re-export the main types for convenience
pub use addon::{AddonSection, CreatedUsers};
pub use config::{AddonConfig, DEFAULT_SYSROOT};
pub use directive::{FollowUp, FollowUpCommand, REALM_TOOL, REALM_TOOL_PACKAGE, RealmDirective};
pub use discovery::DISCOVER_ROOT;
pub use error::{RealmAddonError, Result};
pub use packages::PackageSelection;
pub use runner::{DryRunRunner, ProgramOverride, RunnerError, SystemRunner, ToolRunner};
