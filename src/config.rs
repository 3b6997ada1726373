//! Harness configuration for driving the add-on outside the installer.
//!
//! Inside the installer the sysroot and tool come from the framework; the
//! standalone CLI reads them from a small JSON file instead, so tests and
//! image builds can point the `realm` invocations at a stand-in binary or
//! an alternate mount point.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::directive::REALM_TOOL;

/// Default mount point of the installed system during execution.
pub const DEFAULT_SYSROOT: &str = "/mnt/sysimage";

fn default_tool() -> String {
    REALM_TOOL.to_string()
}

fn default_sysroot() -> PathBuf {
    PathBuf::from(DEFAULT_SYSROOT)
}

/// Add-on harness configuration that can be saved/loaded as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Realm-management tool binary to execute.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Mount point of the installed system, passed as `--install` to the
    /// join and follow-up commands.
    #[serde(default = "default_sysroot")]
    pub sysroot: PathBuf,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            sysroot: default_sysroot(),
        }
    }
}

impl AddonConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            anyhow::bail!("Realm tool binary must be specified");
        }
        if !self.sysroot.is_absolute() {
            anyhow::bail!("Sysroot must be an absolute path");
        }
        Ok(())
    }
}
