//! Integration tests for the rpg CLI binary.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test context with a private RPG_HOME and stub builders.
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn rpg_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rpg"));
        cmd.env("RPG_HOME", self.path().join(".rpg"));
        cmd.env_remove("RPG_MOCK_BIN");
        cmd.env_remove("RPG_RPMBUILD_BIN");
        cmd.env_remove("RPG_BUILD_TIMEOUT_SECS");
        cmd
    }

    fn stub(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write stub");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod stub");
        path
    }
}

fn demo_descriptor() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/demo.toml")
}

const FAKE_MOCK: &str = r#"for arg in "$@"; do
  case "$arg" in --resultdir=*) dir="${arg#--resultdir=}" ;; esac
done
echo "Start: build phase"
echo "gcc: error: foo.c" >&2
touch "$dir/demo-1.0-1.x86_64.rpm"
echo "Finish: build phase" > "$dir/build.log"
exit "${FAKE_EXIT:-0}""#;

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.rpg_cmd().arg("--help").output().expect("failed to run rpg");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("render"));
}

#[test]
fn test_render_demo_to_stdout() {
    let ctx = TestContext::new();
    let output = ctx
        .rpg_cmd()
        .arg("render")
        .arg(demo_descriptor())
        .output()
        .expect("failed to run rpg");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let spec = String::from_utf8_lossy(&output.stdout);
    assert!(spec.starts_with("Name: demo-rpg\nVersion: 1.0\n"));
    assert!(spec.contains("Patch1: test_patch1\nPatch2: test patch2\nPatch3: test patch3\n"));
    assert!(spec.contains("\n%package devel\nSummary: Development files for demo\n"));
    assert!(spec.contains("\n%description doc\nExtra documentation files for demo\n"));
    assert!(spec.contains("\n%files\n%doc README.md\n%{python_sitelib}/demo.py\n"));
    assert!(spec.ends_with(
        "\n%changelog\n* Mon Jun 2015 Erik <erik@example.com>\n- changelog test 1\n\n\
         * Tue Jun 2015 Erik <erik@example.com>\n- changelog test 2\n\n"
    ));
}

#[test]
fn test_render_rejects_unnamed_subpackage() {
    let ctx = TestContext::new();
    let descriptor = ctx.path().join("bad.toml");
    let spec = ctx.path().join("bad.spec");
    std::fs::write(
        &descriptor,
        "[tags]\nName = \"demo\"\n\n[[subpackages]]\n[subpackages.tags]\nSummary = \"x\"\n",
    )
    .unwrap();

    let output = ctx
        .rpg_cmd()
        .arg("render")
        .arg(&descriptor)
        .arg("-o")
        .arg(&spec)
        .output()
        .expect("failed to run rpg");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("subpackage #1"));
    assert!(!spec.exists());
}

#[test]
fn test_rpm_json_outcome() {
    let ctx = TestContext::new();
    let mock = ctx.stub("fake-mock", FAKE_MOCK);
    let out = ctx.path().join("out");

    let output = ctx
        .rpg_cmd()
        .env("RPG_MOCK_BIN", &mock)
        .args(["rpm", "--srpm", "demo.src.rpm", "--distro", "fedora-22", "--arch", "x86_64"])
        .arg("--output")
        .arg(&out)
        .arg("--json")
        .output()
        .expect("failed to run rpg");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let outcome: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(outcome["root"], "fedora-22-x86_64");
    assert_eq!(outcome["exit_code"], 0);
    assert_eq!(outcome["diagnostics"], serde_json::json!(["gcc: error: foo.c"]));
    assert!(out.join("demo-1.0-1.x86_64.rpm").is_file());
    assert!(out.join("mock_logs/build.log").is_file());

    // Live output went to stderr.
    assert!(String::from_utf8_lossy(&output.stderr).contains("Start: build phase"));
}

#[test]
fn test_rpm_nonzero_exit_fails_command() {
    let ctx = TestContext::new();
    let mock = ctx.stub("fake-mock", FAKE_MOCK);
    let out = ctx.path().join("out");

    let output = ctx
        .rpg_cmd()
        .env("RPG_MOCK_BIN", &mock)
        .env("FAKE_EXIT", "3")
        .args(["rpm", "--srpm", "demo.src.rpm", "--distro", "fedora-22", "--arch", "x86_64"])
        .arg("--output")
        .arg(&out)
        .output()
        .expect("failed to run rpg");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("demo-1.0-1.x86_64.rpm"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exit code Some(3)"));
}

#[test]
fn test_check_reports_missing_tools() {
    let ctx = TestContext::new();
    let output = ctx
        .rpg_cmd()
        .env("RPG_MOCK_BIN", "no-such-mock-xyz")
        .env("RPG_RPMBUILD_BIN", "no-such-rpmbuild-xyz")
        .arg("check")
        .output()
        .expect("failed to run rpg");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-mock-xyz (install: mock)"));
}
