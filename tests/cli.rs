//! Integration tests for the `strong-params` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_strong-params"));
    cmd.env_remove("STRONG_PARAMS_ENV")
        .env("STRONG_PARAMS_ON_UNPERMITTED", "false")
        .env("RUST_LOG", "off");
    cmd
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn single_shot_prints_permitted_json() {
    let output = cli()
        .args([r#"["id",{"book":["title"]}]"#, r#"{"id":"1","admin":true,"book":{"title":"Hamlet","isbn":"x"}}"#])
        .output()
        .expect("run binary");

    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), r#"{"id":"1","book":{"title":"Hamlet"}}"#);
}

#[test]
fn single_shot_reads_spec_from_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("spec.json");
    std::fs::write(&path, r#"[{"tags": []}]"#).expect("write spec");

    let output = cli()
        .arg(format!("@{}", path.display()))
        .arg(r#"{"tags":["a","b"],"id":"1"}"#)
        .output()
        .expect("run binary");

    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), r#"{"tags":["a","b"]}"#);
}

#[test]
fn raise_action_fails_the_run() {
    let output = cli()
        .env("STRONG_PARAMS_ON_UNPERMITTED", "raise")
        .args([r#"["id"]"#, r#"{"id":"1","injected":"x"}"#])
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("injected"));
}

#[test]
fn missing_arguments_print_usage() {
    let output = cli().output().expect("run binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Single-shot mode"));
}

#[test]
fn server_mode_answers_each_request() {
    let mut child = cli()
        .env("STRONG_PARAMS_ON_UNPERMITTED", "raise")
        .arg("--server")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn server");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        writeln!(stdin, r#"["id"]"#).unwrap();
        writeln!(stdin, r#"{{"id":"1"}}"#).unwrap();
        writeln!(stdin, r#"["id"]"#).unwrap();
        writeln!(stdin, r#"{{"id":"1","injected":"x"}}"#).unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("server exits on EOF");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Status:Ok\nLength:10\n\n{\"id\":\"1\"}\
         Status:Error\nLength:38\n\nfound unpermitted parameters: injected"
    );
}
