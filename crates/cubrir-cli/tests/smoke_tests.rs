//! Smoke tests for the cubridor CLI
//!
//! Fast checks of the argument surface plus end-to-end runs against a fake
//! shell-script toolchain, so no real compiler or LLVM tools are needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the cubridor binary
fn cubridor() -> Command {
    Command::cargo_bin("cubridor").expect("cubridor binary should exist")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    cubridor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.2"));
}

#[test]
fn test_help_flag() {
    cubridor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("coverage"))
        .stdout(predicate::str::contains("--no-open"))
        .stdout(predicate::str::contains("--objects"));
}

#[test]
fn test_invalid_flag() {
    cubridor().arg("--notaflag").assert().failure();
}

#[test]
fn test_invalid_objects_value() {
    cubridor()
        .args(["--objects", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    cubridor().args(["-q", "-v"]).assert().failure();
}

// ============================================================================
// End-to-End Tests Against a Fake Toolchain
// ============================================================================

#[cfg(unix)]
mod fake_toolchain {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Write an executable shell script into `dir`
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod script");
        path
    }

    /// A project directory with a fake compiled test binary in place
    struct FakeProject {
        temp: TempDir,
        bin: PathBuf,
    }

    impl FakeProject {
        fn new() -> Self {
            let temp = TempDir::new().expect("create temp dir");
            let deps = temp.path().join("target/debug/deps");
            fs::create_dir_all(&deps).expect("create deps dir");
            write_script(&deps, "suite-0f0f0f", "exit 0");
            let bin = temp.path().join("bin");
            fs::create_dir(&bin).expect("create bin dir");
            Self { temp, bin }
        }

        fn path(&self) -> &Path {
            self.temp.path()
        }

        fn tool(&self, name: &str, body: &str) -> PathBuf {
            write_script(&self.bin, name, body)
        }

        /// A cubridor command pointed at this project's fake toolchain
        fn command(&self, cargo: &Path, profdata: &Path, cov: &Path) -> Command {
            let mut cmd = cubridor();
            cmd.args(["--working-dir", self.path().to_str().unwrap()])
                .args(["--cargo", cargo.to_str().unwrap()])
                .args(["--llvm-profdata", profdata.to_str().unwrap()])
                .args(["--llvm-cov", cov.to_str().unwrap()])
                .arg("--no-open");
            cmd
        }
    }

    fn passing_toolchain(project: &FakeProject) -> (PathBuf, PathBuf, PathBuf) {
        let cargo = project.tool(
            "cargo",
            ": > run-1.profraw\n: > run-2.profraw",
        );
        let profdata = project.tool("llvm-profdata", ": > cubrir.profdata");
        let cov = project.tool(
            "llvm-cov",
            "mkdir -p coverage\n: > coverage/index.html",
        );
        (cargo, profdata, cov)
    }

    #[test]
    fn test_full_run_produces_report_and_cleans_up() {
        let project = FakeProject::new();
        let (cargo, profdata, cov) = passing_toolchain(&project);

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .success()
            .stderr(predicate::str::contains("coverage report at"));

        assert!(project.path().join("coverage/index.html").is_file());
        assert!(!project.path().join("run-1.profraw").exists());
        assert!(!project.path().join("run-2.profraw").exists());
        assert!(!project.path().join("cubrir.profdata").exists());
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let project = FakeProject::new();
        let (cargo, profdata, cov) = passing_toolchain(&project);

        project.command(&cargo, &profdata, &cov).assert().success();
        project.command(&cargo, &profdata, &cov).assert().success();

        assert!(project.path().join("coverage/index.html").is_file());
        assert!(!project.path().join("run-1.profraw").exists());
        assert!(!project.path().join("cubrir.profdata").exists());
    }

    #[test]
    fn test_stale_artifacts_removed_first() {
        let project = FakeProject::new();
        let (cargo, profdata, cov) = passing_toolchain(&project);
        fs::write(project.path().join("stale.profraw"), b"old").unwrap();

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .success();

        assert!(!project.path().join("stale.profraw").exists());
    }

    #[test]
    fn test_failing_tests_exit_code() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", "echo 'test result: FAILED' >&2\nexit 101");
        let profdata = project.tool("llvm-profdata", "exit 0");
        let cov = project.tool("llvm-cov", "exit 0");

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("test run failed"));

        // Nothing downstream ran.
        assert!(!project.path().join("coverage").exists());
    }

    #[test]
    fn test_no_fragments_exit_code() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", "exit 0");
        let profdata = project.tool("llvm-profdata", "exit 0");
        let cov = project.tool("llvm-cov", "exit 0");

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("no profiling fragments"));
    }

    #[test]
    fn test_merge_failure_exit_code() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", ": > run-1.profraw");
        let profdata = project.tool("llvm-profdata", "echo 'malformed' >&2\nexit 1");
        let cov = project.tool("llvm-cov", "exit 0");

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .failure()
            .code(4)
            .stderr(predicate::str::contains("profile merge failed"));
    }

    #[test]
    fn test_no_binaries_exit_code() {
        let project = FakeProject::new();
        let (cargo, profdata, cov) = passing_toolchain(&project);
        fs::remove_file(project.path().join("target/debug/deps/suite-0f0f0f")).unwrap();

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .failure()
            .code(5)
            .stderr(predicate::str::contains("no test binaries"));
    }

    #[test]
    fn test_report_failure_exit_code() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", ": > run-1.profraw");
        let profdata = project.tool("llvm-profdata", ": > cubrir.profdata");
        let cov = project.tool("llvm-cov", "echo 'bad profile' >&2\nexit 1");

        project
            .command(&cargo, &profdata, &cov)
            .assert()
            .failure()
            .code(6)
            .stderr(predicate::str::contains("report generation failed"));
    }

    #[test]
    fn test_json_summary_output() {
        let project = FakeProject::new();
        let (cargo, profdata, cov) = passing_toolchain(&project);

        let output = project
            .command(&cargo, &profdata, &cov)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let summary: serde_json::Value =
            serde_json::from_slice(&output).expect("summary should be valid JSON");
        assert_eq!(summary["fragments"], 2);
        assert_eq!(summary["binaries"], 1);
        assert!(summary["entry_page"]
            .as_str()
            .unwrap()
            .ends_with("index.html"));
    }

    #[test]
    fn test_quiet_run_still_fails_loudly() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", "exit 1");
        let profdata = project.tool("llvm-profdata", "exit 0");
        let cov = project.tool("llvm-cov", "exit 0");

        project
            .command(&cargo, &profdata, &cov)
            .arg("--quiet")
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_wildcard_objects_mode() {
        let project = FakeProject::new();
        let cargo = project.tool("cargo", ": > run-1.profraw");
        let profdata = project.tool("llvm-profdata", ": > cubrir.profdata");
        // Record the arguments llvm-cov received, then produce the report.
        let cov = project.tool(
            "llvm-cov",
            "echo \"$@\" > cov-args.txt\nmkdir -p coverage\n: > coverage/index.html",
        );

        project
            .command(&cargo, &profdata, &cov)
            .args(["--objects", "wildcard"])
            .assert()
            .success();

        let args = fs::read_to_string(project.path().join("cov-args.txt")).unwrap();
        assert!(args.contains("target/debug/deps/*"));
        assert!(!args.contains("-object"));
    }
}

#[cfg(unix)]
#[test]
fn test_missing_toolchain_is_generic_error() {
    let temp = tempfile::TempDir::new().expect("create temp dir");

    cubridor()
        .args(["--working-dir", temp.path().to_str().unwrap()])
        .args(["--cargo", "/nonexistent/cargo"])
        .arg("--no-open")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}
