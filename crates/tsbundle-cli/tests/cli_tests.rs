//! Integration tests for tsbundle-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use tsbundle_core::test_utils::ZipTestBuilder;
use tsbundle_core::test_utils::create_test_bundle;

const VERSIONS: &[u8] = br#"{"version":"4.1(1a)","timestamp":"2023-11-02T09:00:00"}
{"version":"4.2(3e)","timestamp":"2024-04-10T12:30:00"}"#;

const SITES: &[u8] = br#"{"common":{"siteid":"2","name":"west","siteversion":"5.2(2)"},"_id":{"$oid":"b2"}}{"common":{"siteid":"1","name":"east","siteversion":"5.2(1)"},"_id":{"$oid":"a1"}}"#;

const AUDITS: &[u8] = br#"{"type":"backup","timestamp":"2024-04-11T00:00:00","description":"scheduled backup"}
{"type":"login","timestamp":"2024-04-10T13:00:00","description":"admin logged in"}
{"type":"site","timestamp":"2024-04-10T14:00:00","description":"site west updated"}"#;

fn tsbundle_cmd() -> Command {
    cargo_bin_cmd!("tsbundle")
}

fn write_bundle(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("failed to write bundle");
    path
}

fn full_bundle(dir: &Path) -> PathBuf {
    write_bundle(
        dir,
        "ts-bundle.zip",
        &create_test_bundle(&[(
            "msc-db-json-20240412",
            &[
                ("msc_versions.json", VERSIONS),
                ("msc_site2.json", SITES),
                ("msc_audit.json", AUDITS),
            ],
        )]),
    )
}

#[test]
fn test_version_flag() {
    tsbundle_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tsbundle"));
}

#[test]
fn test_help_flag() {
    tsbundle_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("BUNDLE"));
}

#[test]
fn test_missing_argument() {
    tsbundle_cmd().assert().failure();
}

#[test]
fn test_report_sections() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = full_bundle(temp.path());

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "NDO Basic Output v{}",
            env!("CARGO_PKG_VERSION")
        )))
        .stdout(predicate::str::contains(
            "NDO versions found:\n - Version: 4.2(3e), Date: 2024-04-10T12:30:00\n - Version: 4.1(1a), Date: 2023-11-02T09:00:00",
        ))
        .stdout(predicate::str::contains(
            "Site ID Name Site Version Site OID\n------- ---- ------------ --------\n1       east 5.2(1)       a1      \n2       west 5.2(2)       b2      ",
        ))
        .stdout(predicate::str::contains(
            "Last 20 audits (ignoring backup):\n---------------------------------\n2024-04-10T14:00:00 - site west updated\n2024-04-10T13:00:00 - admin logged in",
        ))
        .stdout(predicate::str::contains("scheduled backup").not());
}

#[test]
fn test_report_expands_in_place() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = full_bundle(temp.path());

    tsbundle_cmd().arg(&bundle).assert().success();

    assert!(
        temp.path()
            .join("ts-bundle/msc-db-json-20240412_temp/msc-db-json-20240412_temp/backup/msc_audit.json")
            .is_file()
    );
}

#[test]
fn test_rerun_gives_same_report() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = full_bundle(temp.path());

    let first = tsbundle_cmd().arg(&bundle).output().unwrap();
    let second = tsbundle_cmd().arg(&bundle).output().unwrap();

    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_missing_records_still_succeed() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(
        temp.path(),
        "empty.zip",
        &ZipTestBuilder::new().add_file("readme.txt", b"nothing here").build(),
    );

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("No NDO version information found."))
        .stdout(predicate::str::contains("No site information found."))
        .stdout(predicate::str::contains("No relevant audit entries found."))
        .stderr(predicate::str::contains(
            "no file matches msc-db-json-*_temp/*_temp/backup/msc_site2.json",
        ));
}

#[test]
fn test_damaged_records_reported() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(
        temp.path(),
        "ts.zip",
        &create_test_bundle(&[(
            "msc-db-json-1",
            &[(
                "msc_versions.json",
                br#"{"version":"4.2","timestamp":"2024-01-01"}{"version":,}"#,
            )],
        )]),
    );

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains(" - Version: 4.2, Date: 2024-01-01"))
        .stderr(predicate::str::contains("invalid object at bytes"));
}

#[test]
fn test_nested_failure_is_not_fatal() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(
        temp.path(),
        "ts.zip",
        &ZipTestBuilder::new()
            .add_file("broken.tar.gz", b"\x1f\x8bnot really")
            .build(),
    );

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .success()
        .stderr(predicate::str::contains("could not unpack"))
        .stderr(predicate::str::contains("broken.tar.gz"));
}

#[test]
fn test_nonexistent_bundle() {
    tsbundle_cmd()
        .arg("/nonexistent/ts-bundle.zip")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_corrupt_bundle() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(temp.path(), "ts.zip", b"definitely not a zip");

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid bundle"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_unsupported_suffix() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let bundle = write_bundle(temp.path(), "ts.rar", b"Rar!");

    tsbundle_cmd()
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}
