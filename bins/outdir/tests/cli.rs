use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `<temp>/android` with a settings script; returns (temp, canonical android dir)
fn android_project(settings: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let android = temp.path().join("android");
    std::fs::create_dir_all(&android).unwrap();
    std::fs::write(android.join("settings.gradle.kts"), settings).unwrap();
    let android = std::fs::canonicalize(&android).unwrap();
    (temp, android)
}

fn outdir(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("outdir").unwrap();
    cmd.arg("-C").arg(project).arg("--no-color").env_remove("RUST_LOG");
    cmd
}

fn shared_root(android: &Path) -> PathBuf {
    android.parent().unwrap().join("build")
}

#[test]
fn plan_json_lists_every_module_under_root() {
    let (_temp, android) = android_project("include(\":app\", \":libA\", \":libB\")\n");

    let output = outdir(&android).args(["--json", "plan"]).output().unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let root = shared_root(&android);
    assert_eq!(plan["root"]["path"], root.to_str().unwrap());
    let modules = plan["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 3);
    for (entry, name) in modules.iter().zip(["app", "libA", "libB"]) {
        assert_eq!(entry["name"], name);
        assert_eq!(entry["path"], root.join(name).to_str().unwrap());
    }
}

#[test]
fn order_puts_app_first() {
    let (_temp, android) = android_project("include(\":libA\", \":app\")\n");

    outdir(&android)
        .args(["--json", "order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"first\": \"app\""));
}

#[test]
fn missing_app_is_a_configuration_error() {
    let (temp, android) = android_project("include(\":libA\")\n");

    outdir(&android)
        .arg("prepare")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("'app'"));

    assert!(!temp.path().join("build").exists());
}

#[test]
fn prepare_then_clean_removes_root() {
    let (_temp, android) = android_project("include(\":app\", \":libA\")\n");
    let root = shared_root(&android);

    outdir(&android).arg("prepare").assert().success();
    assert!(root.join("app").is_dir());
    assert!(root.join("libA").is_dir());
    std::fs::write(root.join("app/app-debug.apk"), b"apk").unwrap();

    outdir(&android)
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would delete 1 file"));
    assert!(root.exists());

    outdir(&android).arg("clean").assert().success();
    assert!(!root.exists());
}

#[test]
fn clean_without_build_output_succeeds() {
    let (_temp, android) = android_project("include(\":app\")\n");

    outdir(&android)
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn clean_does_not_need_a_valid_tree() {
    // clean only resolves the root, so a tree without :app still cleans
    let (_temp, android) = android_project("include(\":libA\")\n");
    let root = shared_root(&android);
    std::fs::create_dir_all(root.join("libA")).unwrap();

    outdir(&android).arg("clean").assert().success();
    assert!(!root.exists());
}

#[test]
fn clean_failure_exits_with_io_code() {
    let (temp, android) = android_project("include(\":app\")\n");
    std::fs::write(temp.path().join("blocker"), b"not a directory").unwrap();
    std::fs::write(
        android.join(".outdir.toml"),
        "[layout]\nrelocate_to = \"../../blocker/build\"\n",
    )
    .unwrap();

    outdir(&android)
        .arg("clean")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Failed to delete"));
    assert!(temp.path().join("blocker").is_file());
}

#[test]
fn relocation_onto_project_is_refused() {
    let (_temp, android) = android_project("include(\":app\")\n");
    std::fs::write(android.join(".outdir.toml"), "[layout]\nrelocate_to = \"..\"\n").unwrap();

    outdir(&android).arg("clean").assert().code(3);
    assert!(android.join("settings.gradle.kts").exists());
}

#[test]
fn config_file_changes_relocation() {
    let (_temp, android) = android_project("include(\":app\")\n");
    std::fs::write(
        android.join(".outdir.toml"),
        "[layout]\nrelocate_to = \"../out\"\n",
    )
    .unwrap();

    let output = outdir(&android).args(["--json", "plan"]).output().unwrap();
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["root"]["path"], android.join("out").to_str().unwrap());
}
