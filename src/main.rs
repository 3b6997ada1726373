//! realm-addon - Main entry point
//!
//! Standalone harness around the library: validates a kickstart `%addon`
//! section, or runs the full setup/execute cycle against a target sysroot.

use log::{error, info};
use std::path::{Path, PathBuf};

use realm_addon::cli::{Cli, Commands};
use realm_addon::{
    AddonConfig, AddonSection, CreatedUsers, DryRunRunner, PackageSelection, ProgramOverride,
    REALM_TOOL, RealmDirective, SystemRunner, ToolRunner,
};

/// Initialize the logger with appropriate settings
fn init_logger() {
    use env_logger::Builder;
    use std::io::Write;

    Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env() // Allows RUST_LOG env var to override
        .init();
}

/// Main application entry point
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let cli = Cli::parse_args();
    match cli.command {
        Commands::Validate { section } => {
            validate_section(&section)?;
        }
        Commands::Run {
            section,
            config,
            sysroot,
        } => {
            run_section(&section, config.as_deref(), sysroot, cli.dry_run)?;
        }
    }

    Ok(())
}

/// Read and parse a section file, exiting with a diagnostic when it does
/// not parse.
fn load_directive(section: &Path) -> Result<RealmDirective, Box<dyn std::error::Error>> {
    match RealmDirective::from_section_file(section) {
        Ok(directive) => Ok(directive),
        Err(e) if e.is_parse_error() => {
            error!("Section validation failed: {}", e);
            eprintln!("✗ Section validation failed: {}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate a section body and print its canonical serialized form.
fn validate_section(section: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Validating section file: {:?}", section);
    let directive = load_directive(section)?;

    info!("Section validation successful");
    println!("✓ Section is valid: {:?}", section);
    let canonical = directive.to_string();
    if !canonical.is_empty() {
        println!("{}", canonical);
    }

    Ok(())
}

/// Run the setup and execution phases for a section.
fn run_section(
    section: &Path,
    config_path: Option<&Path>,
    sysroot: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            AddonConfig::load_from_file(path)?
        }
        None => AddonConfig::default(),
    };
    if let Some(sysroot) = sysroot {
        config.sysroot = sysroot;
    }
    config.validate()?;

    let mut directive = load_directive(section)?;

    let mut runner: Box<dyn ToolRunner> = if dry_run {
        info!("Dry-run mode: realm commands will be logged, not executed");
        Box::new(DryRunRunner::new())
    } else if config.tool != REALM_TOOL {
        info!("Using realm tool stand-in: {}", config.tool);
        Box::new(ProgramOverride::new(
            SystemRunner,
            REALM_TOOL,
            config.tool.clone(),
        ))
    } else {
        Box::new(SystemRunner)
    };

    let mut packages = PackageSelection::new();
    directive.setup(runner.as_mut(), &mut packages);
    if packages.is_empty() {
        info!("Discovery reported no packages to install");
    } else {
        println!(
            "Packages required for the realm join: {}",
            packages.as_slice().join(", ")
        );
    }

    directive.execute(runner.as_mut(), &config.sysroot, &CreatedUsers::default());

    if directive.discovered_realm().is_empty() {
        println!("No realm was discovered; nothing to join (see log for details)");
    } else {
        println!(
            "✓ Finished running realm commands for {}",
            directive.discovered_realm()
        );
    }

    Ok(())
}
