use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// realm-addon - kickstart realm join handler
#[derive(Parser)]
#[command(name = "realm-addon")]
#[command(about = "Joins the installed system to an authentication realm from a kickstart section")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: log realm invocations without executing them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a section body and print its canonical form
    Validate {
        /// Path to the %addon section body (one directive per line)
        section: PathBuf,
    },
    /// Run discovery, the join and the follow-up commands for a section
    Run {
        /// Path to the %addon section body
        section: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Mount point of the installed system (overrides the config)
        #[arg(long)]
        sysroot: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
