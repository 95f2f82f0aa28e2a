//! Integration tests for CLI commands.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SECRET: &str = "an-exactly-32-byte-long-secret!!";

/// A command isolated from the caller's home directory and key.
fn brickvault(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("brickvault").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("ENCRYPTION_KEY")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

// ============================================================================
// Access decisions
// ============================================================================

#[test]
fn approved_investor_may_invest() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args([
            "check",
            "--role",
            "investor-unverified",
            "--kyc-status",
            "approved",
            "--action",
            "make-investment",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "allow make-investment (INVESTOR_UNVERIFIED/APPROVED)",
        ));
}

#[test]
fn pending_investor_may_not_invest() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args([
            "check",
            "--role",
            "investor-verified",
            "--kyc-status",
            "pending",
            "--action",
            "make-investment",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("deny make-investment"));
}

#[test]
fn admin_is_not_an_investor() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args([
            "check",
            "--role",
            "admin",
            "--kyc-status",
            "approved",
            "--action",
            "make-investment",
        ])
        .assert()
        .failure();
}

#[test]
fn guests_may_browse_listings() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args([
            "check",
            "--role",
            "guest",
            "--kyc-status",
            "not-started",
            "--action",
            "view-properties",
        ])
        .assert()
        .success();
}

#[test]
fn permissions_lists_every_action_for_one_identity() {
    let home = TempDir::new().unwrap();
    let assert = brickvault(&home)
        .args(["permissions", "--role", "admin", "--kyc-status", "approved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KYC status: APPROVED"))
        .stdout(predicate::str::contains("KYC status: PENDING").not())
        .stdout(predicate::str::contains("ADMIN"))
        .stdout(predicate::str::contains("GUEST").not())
        .stdout(predicate::str::contains("distribute-dividends"))
        .stdout(predicate::str::contains("\u{1b}[").not());

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    // investing and submitting KYC are investor-only
    assert_eq!(stdout.matches("deny").count(), 2);
}

#[test]
fn permissions_without_filters_prints_every_status() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .arg("permissions")
        .assert()
        .success()
        .stdout(predicate::str::contains("KYC status: NOT_STARTED"))
        .stdout(predicate::str::contains("KYC status: PENDING"))
        .stdout(predicate::str::contains("KYC status: APPROVED"))
        .stdout(predicate::str::contains("KYC status: REJECTED"));
}

// ============================================================================
// Protection helpers
// ============================================================================

#[test]
fn mask_shows_last_four_digits() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["mask", "123-45-6789"])
        .assert()
        .success()
        .stdout("***-**-6789\n");
}

#[test]
fn mask_short_value_is_fully_masked() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["mask", "12"])
        .assert()
        .success()
        .stdout("***-**-****\n");
}

#[test]
fn mask_account_number() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["mask", "--account", "000123456789"])
        .assert()
        .success()
        .stdout("****6789\n");
}

#[test]
fn hash_prints_sha256_hex() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["hash", "hello"])
        .assert()
        .success()
        .stdout("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824\n");
}

#[test]
fn keygen_quiet_prints_only_the_secret() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["keygen", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[A-Za-z0-9]{32}\n$").unwrap());
}

#[test]
fn keygen_secrets_are_unique() {
    let home = TempDir::new().unwrap();
    let first = brickvault(&home).args(["keygen", "-q"]).output().unwrap();
    let second = brickvault(&home).args(["keygen", "-q"]).output().unwrap();
    assert_ne!(first.stdout, second.stdout);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_validate_succeeds_with_key() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    brickvault(&home)
        .env("ENCRYPTION_KEY", SECRET)
        .args(["config", "validate", "--project"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_fails_without_key() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    brickvault(&home)
        .args(["config", "validate", "--project"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENCRYPTION_KEY is not set"));
}

#[test]
fn config_validate_rejects_short_key() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    brickvault(&home)
        .env("ENCRYPTION_KEY", "too-short")
        .args(["config", "validate", "--project"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENCRYPTION_KEY is unusable"));
}

#[test]
fn config_validate_rejects_underage_minimum() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("brickvault.toml"),
        "[kyc]\nminimum_age = 16\n",
    )
    .unwrap();

    brickvault(&home)
        .env("ENCRYPTION_KEY", SECRET)
        .args(["config", "validate", "--project"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("kyc.minimum_age"));
}

#[test]
fn config_show_honors_project_file() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("brickvault.toml"),
        "[protection]\nkey_env = \"BRICKVAULT_TEST_KEY\"\n",
    )
    .unwrap();

    brickvault(&home)
        .args(["config", "show", "--project"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("BRICKVAULT_TEST_KEY"))
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("brickvault.toml (project)"));
}

#[test]
fn config_show_renders_toml() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    brickvault(&home)
        .args(["config", "show", "--format", "toml", "--project"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[protection]"))
        .stdout(predicate::str::contains("key_env = \"ENCRYPTION_KEY\""));
}

#[test]
fn config_show_rejects_unknown_format() {
    let home = TempDir::new().unwrap();
    brickvault(&home)
        .args(["config", "show", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format 'yaml'"));
}
