//! End-to-end tests for the add-on lifecycle
//!
//! These tests drive parse → setup → execute over a recording runner and
//! verify the exact invocation shapes handed to the external realm tool.

mod common;

use std::path::PathBuf;

use common::RecordingRunner;
use realm_addon::{AddonSection, CreatedUsers, PackageSelection, RealmDirective};

const SECTION: &str = "\
join --client-software=sssd --one-time-password=12345 EXAMPLE.COM
permit -a
deny -v
";

const DISCOVERY_OUTPUT: &str = "\
EXAMPLE.COM
required-package: sssd
required-package: adcli
unrelated: x
";

fn sysroot() -> PathBuf {
    PathBuf::from("/mnt/sysimage")
}

fn discovered_directive(section: &str, runner: &mut RecordingRunner) -> RealmDirective {
    let mut directive = RealmDirective::from_section(section).expect("section should parse");
    runner
        .capture_results
        .push_back(Ok(DISCOVERY_OUTPUT.to_string()));

    let mut packages = PackageSelection::new();
    directive.setup(runner, &mut packages);
    directive
}

// =============================================================================
// Full Lifecycle
// =============================================================================

#[test]
fn test_full_lifecycle_invocation_sequence() {
    let mut runner = RecordingRunner::default();
    let directive = discovered_directive(SECTION, &mut runner);

    assert_eq!(directive.discovered_realm(), "EXAMPLE.COM");
    assert_eq!(directive.required_packages(), ["realmd", "sssd", "adcli"]);

    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    assert_eq!(runner.calls.len(), 4);
    assert_eq!(
        runner.calls[0],
        [
            "realm",
            "discover",
            "--verbose",
            "--install",
            "/",
            "--client-software=sssd",
            "EXAMPLE.COM",
        ]
    );
    // The explicit one-time password suppresses the default --no-password.
    assert_eq!(
        runner.calls[1],
        [
            "realm",
            "join",
            "--install",
            "/mnt/sysimage",
            "--verbose",
            "--client-software=sssd",
            "--one-time-password=12345",
            "EXAMPLE.COM",
        ]
    );
    assert_eq!(
        runner.calls[2],
        ["realm", "permit", "--install", "/mnt/sysimage", "--verbose", "-a"]
    );
    assert_eq!(
        runner.calls[3],
        ["realm", "deny", "--install", "/mnt/sysimage", "--verbose", "-v"]
    );
}

#[test]
fn test_join_without_password_options_gets_default_flag() {
    let mut runner = RecordingRunner::default();
    let directive = discovered_directive("join EXAMPLE.COM\n", &mut runner);

    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    assert_eq!(
        runner.calls[1],
        [
            "realm",
            "join",
            "--install",
            "/mnt/sysimage",
            "--verbose",
            "--no-password",
            "EXAMPLE.COM",
        ]
    );
}

// =============================================================================
// Failure Gating
// =============================================================================

#[test]
fn test_failed_join_runs_no_follow_ups() {
    let mut runner = RecordingRunner::default();
    let directive = discovered_directive(SECTION, &mut runner);

    runner.run_results.push_back(Ok(1));
    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    // discover + join only
    assert_eq!(runner.calls.len(), 2);
    assert_eq!(runner.calls[1][1], "join");
}

#[test]
fn test_join_launch_failure_runs_no_follow_ups() {
    let mut runner = RecordingRunner::default();
    let directive = discovered_directive(SECTION, &mut runner);

    runner
        .run_results
        .push_back(Err(RecordingRunner::launch_failure()));
    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    assert_eq!(runner.calls.len(), 2);
}

#[test]
fn test_follow_up_failures_are_independent() {
    let mut runner = RecordingRunner::default();
    let directive = discovered_directive(SECTION, &mut runner);

    runner.run_results.push_back(Ok(0)); // join succeeds
    runner.run_results.push_back(Ok(2)); // permit fails
    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    // The deny after the failed permit still ran.
    assert_eq!(runner.calls.len(), 4);
    assert_eq!(runner.calls[3][1], "deny");
}

#[test]
fn test_discovery_launch_failure_is_soft() {
    let mut directive = RealmDirective::from_section(SECTION).expect("section should parse");
    let mut runner = RecordingRunner::default();
    runner
        .capture_results
        .push_back(Err(RecordingRunner::launch_failure()));

    let mut packages = PackageSelection::new();
    directive.setup(&mut runner, &mut packages);

    assert!(packages.is_empty());
    assert!(directive.discovered_realm().is_empty());

    // Without a discovered realm, execution does nothing at all.
    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());
    assert_eq!(runner.calls.len(), 1);
}

// =============================================================================
// Package List Handling
// =============================================================================

#[test]
fn test_setup_does_not_duplicate_existing_packages() {
    let mut directive = RealmDirective::from_section(SECTION).expect("section should parse");
    let mut runner = RecordingRunner::default();
    runner
        .capture_results
        .push_back(Ok(DISCOVERY_OUTPUT.to_string()));

    let mut packages = PackageSelection::from_packages(["sssd", "chrony"]);
    directive.setup(&mut runner, &mut packages);

    assert_eq!(packages.as_slice(), ["sssd", "chrony", "realmd", "adcli"]);
}

#[test]
fn test_permit_only_section_is_inert() {
    let mut directive =
        RealmDirective::from_section("permit -a\n").expect("section should parse");
    let mut runner = RecordingRunner::default();

    let mut packages = PackageSelection::new();
    directive.setup(&mut runner, &mut packages);
    directive.execute(&mut runner, &sysroot(), &CreatedUsers::default());

    assert!(runner.calls.is_empty());
    assert!(packages.is_empty());
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_serialized_section_revalidates() {
    let directive = RealmDirective::from_section(SECTION).expect("section should parse");
    let serialized = directive.to_string();

    let reparsed = RealmDirective::from_section(&serialized).expect("canonical form re-parses");
    assert_eq!(directive, reparsed);
}
