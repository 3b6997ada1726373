//! Kickstart `realm` directive parsing and re-serialization.
//!
//! A section body holds one directive per line. Lines are tokenized with
//! shell-word rules, then dispatched on the leading command word: `join`
//! records the realm to join (at most once per section), `permit`/`deny`
//! enqueue follow-up commands replayed after a successful join. The
//! directive re-serializes to canonical section text for embedding into a
//! generated kickstart file.

use std::fmt;

use clap::Parser;
use strum::{Display, EnumString};

use crate::error::{RealmAddonError, Result};

/// External realm-management tool invoked for discovery, join and follow-ups.
pub const REALM_TOOL: &str = "realm";

/// Package providing the realm-management tool on the installed system.
pub const REALM_TOOL_PACKAGE: &str = "realmd";

/// Post-join command controlling which realm identities may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FollowUpCommand {
    Permit,
    Deny,
}

/// One queued `permit`/`deny` invocation, with its original arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub command: FollowUpCommand,
    pub args: Vec<String>,
}

/// Parsed state of a realm `%addon` section.
///
/// Constructed empty, mutated line-by-line while the section is read, then
/// by discovery once during setup, and read-only during execution.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RealmDirective {
    pub(crate) join_realm: Option<String>,
    pub(crate) join_args: Vec<String>,
    pub(crate) discover_options: Vec<String>,
    pub(crate) follow_ups: Vec<FollowUp>,
    pub(crate) discovered_realm: String,
    pub(crate) required_packages: Vec<String>,
}

/// Options accepted by a `join` directive line. Long options only; exactly
/// one positional realm name must remain after they are stripped.
#[derive(Parser, Debug)]
#[command(name = "join", no_binary_name = true, disable_help_flag = true)]
#[allow(dead_code)] // options are validated here, then replayed verbatim from the original argument vector
struct JoinOptions {
    #[arg(long, value_name = "SOFTWARE")]
    client_software: Option<String>,

    #[arg(long, value_name = "SOFTWARE")]
    server_software: Option<String>,

    #[arg(long, value_name = "SOFTWARE")]
    membership_software: Option<String>,

    #[arg(long, value_name = "PASSWORD")]
    one_time_password: Option<String>,

    /// Value is optional and only accepted in `--no-password=VALUE` form.
    #[arg(long, num_args = 0..=1, require_equals = true, value_name = "VALUE")]
    no_password: Option<Option<String>>,

    #[arg(long, value_name = "OU")]
    computer_ou: Option<String>,

    #[arg(value_name = "REALM")]
    realm: Vec<String>,
}

/// Options accepted by `permit` and `deny` directive lines. Positional
/// names (users, groups) may follow the options.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
#[allow(dead_code)] // validation only; the original argument vector is what gets enqueued
struct PermitDenyOptions {
    #[arg(short = 'a', long)]
    all: bool,

    #[arg(short = 'v', long)]
    verbose: bool,

    #[arg(value_name = "NAME")]
    names: Vec<String>,
}

impl RealmDirective {
    pub fn new() -> Self {
        Self::default()
    }

    /// Realm name requested by the `join` line, if one was parsed.
    pub fn join_realm(&self) -> Option<&str> {
        self.join_realm.as_deref()
    }

    /// Verbatim arguments of the `join` line (options and realm name).
    pub fn join_args(&self) -> &[String] {
        &self.join_args
    }

    /// Software-selection options replayed to discovery, as `--name=value`.
    pub fn discover_options(&self) -> &[String] {
        &self.discover_options
    }

    /// Queued `permit`/`deny` commands in parse order.
    pub fn follow_ups(&self) -> &[FollowUp] {
        &self.follow_ups
    }

    /// Realm name as reported by discovery; empty until discovery succeeds.
    pub fn discovered_realm(&self) -> &str {
        &self.discovered_realm
    }

    /// Packages discovery reported as necessary, seed package first.
    pub fn required_packages(&self) -> &[String] {
        &self.required_packages
    }

    /// Parse one directive line from the section body.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        let tokens = shlex::split(line.trim())
            .ok_or_else(|| RealmAddonError::invalid_arguments("unbalanced quoting"))?;

        // Generated sections lead every line with the tool name; accept it
        // so canonical output re-parses.
        let mut tokens = tokens.as_slice();
        if tokens.first().map(String::as_str) == Some(REALM_TOOL) {
            tokens = &tokens[1..];
        }

        let Some((command, args)) = tokens.split_first() else {
            return Err(RealmAddonError::EmptyCommand);
        };

        if command.as_str() == "join" {
            return self.parse_join(args);
        }
        match command.parse::<FollowUpCommand>() {
            Ok(follow_up) => self.parse_permit_or_deny(follow_up, args),
            Err(_) => Err(RealmAddonError::UnsupportedCommand(command.clone())),
        }
    }

    /// Load and parse a section body from a file.
    pub fn from_section_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_section(&text)
    }

    /// Parse a whole `%addon` section body.
    ///
    /// Blank lines and `#` comments are skipped; every other line must be a
    /// valid directive.
    pub fn from_section(text: &str) -> Result<Self> {
        let mut directive = Self::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            directive.handle_line(trimmed)?;
        }
        Ok(directive)
    }

    fn parse_join(&mut self, args: &[String]) -> Result<()> {
        if self.join_realm.is_some() {
            return Err(RealmAddonError::DuplicateJoin);
        }

        let opts = JoinOptions::try_parse_from(args.iter().map(String::as_str))
            .map_err(|err| RealmAddonError::invalid_arguments(render_clap_error(&err)))?;
        let [realm] = opts.realm.as_slice() else {
            return Err(RealmAddonError::RealmCount);
        };

        self.join_realm = Some(realm.clone());
        self.join_args = args.to_vec();

        // Only the software-selection options carry over to discovery.
        self.discover_options.clear();
        let software = [
            ("--client-software", &opts.client_software),
            ("--server-software", &opts.server_software),
            ("--membership-software", &opts.membership_software),
        ];
        for (flag, value) in software {
            if let Some(value) = value {
                self.discover_options.push(format!("{flag}={value}"));
            }
        }

        Ok(())
    }

    fn parse_permit_or_deny(&mut self, command: FollowUpCommand, args: &[String]) -> Result<()> {
        PermitDenyOptions::try_parse_from(args.iter().map(String::as_str))
            .map_err(|err| RealmAddonError::invalid_arguments(render_clap_error(&err)))?;

        self.follow_ups.push(FollowUp {
            command,
            args: args.to_vec(),
        });
        Ok(())
    }
}

impl fmt::Display for RealmDirective {
    /// Canonical section text: one `realm join` line when a join was
    /// recorded, one `realm permit`/`realm deny` line per follow-up.
    /// Arguments are re-quoted canonically, not byte-preserved.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if !self.join_args.is_empty() {
            lines.push(format!(
                "{} join {}",
                REALM_TOOL,
                shell_join(&self.join_args)
            ));
        }
        for follow_up in &self.follow_ups {
            if follow_up.args.is_empty() {
                lines.push(format!("{} {}", REALM_TOOL, follow_up.command));
            } else {
                lines.push(format!(
                    "{} {} {}",
                    REALM_TOOL,
                    follow_up.command,
                    shell_join(&follow_up.args)
                ));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

/// Quote tokens for reinsertion into shell-readable directive text.
///
/// Tokens originate from line-oriented input and cannot contain NUL, the
/// only byte `shlex` refuses to quote; such a token passes through raw.
fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| match shlex::try_quote(arg) {
            Ok(quoted) => quoted.into_owned(),
            Err(_) => arg.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First message line of a clap error, without the `error: ` prefix or the
/// usage block.
fn render_clap_error(err: &clap::Error) -> String {
    err.to_string()
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("malformed arguments")
        .trim()
        .trim_start_matches("error: ")
        .to_string()
}
