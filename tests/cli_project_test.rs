//! Integration tests for `mcs project` commands.

mod common;

use common::{TestEnv, parse_json};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_project_root_from_subdirectory() {
    let env = TestEnv::with_git_project();
    let nested = env.project_path().join("Sources").join("App");
    fs::create_dir_all(&nested).unwrap();

    let output = env.mcs().current_dir(&nested).args(["project", "root"]).output().unwrap();
    assert!(output.status.success());

    let result = parse_json(&output.stdout);
    assert_eq!(result["root"], env.project_path().display().to_string());
}

#[test]
fn test_project_root_with_local_marker() {
    let env = TestEnv::new();
    fs::write(env.project_path().join("CLAUDE.local.md"), "# notes").unwrap();

    env.mcs()
        .args(["-H", "project", "root"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env.project_path().display().to_string()));
}

#[test]
fn test_project_flag_is_used_literally() {
    let env = TestEnv::with_git_project();
    let sub = env.project_path().join("pkg");
    fs::create_dir_all(&sub).unwrap();

    let output = env.mcs().arg("-C").arg(&sub).args(["project", "root"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(parse_json(&output.stdout)["root"], sub.display().to_string());
}

#[test]
fn test_project_flag_must_exist() {
    let env = TestEnv::new();

    env.mcs()
        .args(["-H", "-C", "/definitely/not/here", "project", "root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_add_pack_and_list() {
    let env = TestEnv::with_git_project();

    env.mcs()
        .args(["project", "packs"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""initialized":false"#));

    env.mcs()
        .args(["project", "add-pack", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""added":true"#));
    env.mcs().args(["project", "add-pack", "ios"]).assert().success();
    env.mcs()
        .args(["project", "add-pack", "ios"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""added":false"#));

    let output = env.mcs().args(["project", "packs"]).output().unwrap();
    let result = parse_json(&output.stdout);
    assert_eq!(result["initialized"], true);
    assert_eq!(result["packs"], serde_json::json!(["ios", "web"]));

    let state = env.project_path().join(".claude").join(".mcs-project");
    let content = fs::read_to_string(state).unwrap();
    assert!(content.contains("\"configured_packs\""));
}

#[test]
fn test_add_pack_from_subdirectory_uses_root() {
    let env = TestEnv::with_git_project();
    let nested = env.project_path().join("deep").join("er");
    fs::create_dir_all(&nested).unwrap();

    env.mcs()
        .current_dir(&nested)
        .args(["project", "add-pack", "rust"])
        .assert()
        .success();

    assert!(env.project_path().join(".claude").join(".mcs-project").exists());
    assert!(!nested.join(".claude").exists());
}

#[test]
fn test_add_pack_rejects_blank_name() {
    let env = TestEnv::with_git_project();

    env.mcs()
        .args(["-H", "project", "add-pack", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pack name cannot be empty"));
}
