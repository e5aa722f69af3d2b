//! Integration tests for the twofa binary
//!
//! Each test points the binary at a scratch keychain through
//! TWOFA_KEYCHAIN and checks stdout, stderr and the file contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const TWOFA_BINARY: &str = env!("CARGO_BIN_EXE_twofa");
const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("keychain");
    (dir, path)
}

fn twofa(keychain: &Path, args: &[&str], stdin: &str) -> Output {
    twofa_with_env(keychain, args, stdin, &[])
}

fn twofa_with_env(keychain: &Path, args: &[&str], stdin: &str, envs: &[(&str, &str)]) -> Output {
    let mut child = Command::new(TWOFA_BINARY)
        .args(args)
        .env("TWOFA_KEYCHAIN", keychain)
        .env_remove("JOURNAL_STREAM")
        .env_remove("TWOFA_LOG")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run twofa");
    // The binary may exit without reading stdin
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_add_then_list() {
    let (_dir, path) = scratch();

    let output = twofa(&path, &["--add", "github"], "nzxx iidb ebvw k6jb\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("2fa key for github: "));
    assert!(stdout(&output).is_empty());

    let output = twofa(&path, &["--add", "-8", "--hotp", "bank"], &format!("{}\n", RFC_SECRET));
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = twofa(&path, &["--list"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "bank\ngithub\n");

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!(
            "github 6 nzxxiidbebvwk6jb\nbank 8 {} 00000000000000000000\n",
            RFC_SECRET
        )
    );
}

#[test]
fn test_show_counter_key_advances() {
    let (_dir, path) = scratch();
    fs::write(&path, format!("bank 6 {} 00000000000000000000\n", RFC_SECRET)).unwrap();

    let first = twofa(&path, &["bank"], "");
    let second = twofa(&path, &["bank"], "");

    assert!(first.status.success());
    assert_eq!(stdout(&first), "287082\n");
    assert_eq!(stdout(&second), "359152\n");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("bank 6 {} 00000000000000000002\n", RFC_SECRET)
    );
}

#[test]
fn test_show_all_masks_counter_keys() {
    let (_dir, path) = scratch();
    let contents = format!(
        "bank 8 {s} 00000000000000000000\ngithub 6 {s}\n",
        s = RFC_SECRET
    );
    fs::write(&path, &contents).unwrap();

    let output = twofa(&path, &[], "");
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "--------\tbank");
    let (code, name) = lines[1].split_once('\t').unwrap();
    assert_eq!(name, "github");
    assert_eq!(code.len(), 8);
    assert!(code.trim_end().chars().all(|c| c.is_ascii_digit()));
    assert_eq!(code.trim_end().len(), 6);

    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_unknown_key_is_fatal() {
    let (_dir, path) = scratch();

    let output = twofa(&path, &["missing"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("2fa: no such key \"missing\""));
}

#[test]
fn test_malformed_line_reported_but_not_fatal() {
    let (_dir, path) = scratch();
    fs::write(
        &path,
        format!("github 6 {s}\nbroken 9 {s}\n", s = RFC_SECRET),
    )
    .unwrap();

    let output = twofa(&path, &["--list"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "github\n");
    assert!(stderr(&output).contains(&format!("2fa: {}:2: malformed key", path.display())));
}

#[test]
fn test_inherited_journal_stream_keeps_stderr_diagnostics() {
    let (_dir, path) = scratch();
    fs::write(
        &path,
        format!("github 6 {s}\nbroken 9 {s}\n", s = RFC_SECRET),
    )
    .unwrap();

    let output = twofa_with_env(&path, &["--list"], "", &[("JOURNAL_STREAM", "8:1234")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "github\n");
    assert!(stderr(&output).contains(&format!("2fa: {}:2: malformed key", path.display())));
}

#[test]
fn test_invalid_key_rejected() {
    let (_dir, path) = scratch();

    let output = twofa(&path, &["--add", "github"], "not base32!\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2fa: invalid key"));
    assert!(!path.exists());
}

#[test]
fn test_add_accepts_secret_with_nonzero_trailing_bits() {
    let (_dir, path) = scratch();

    let output = twofa(&path, &["--add", "legacy"], "JBSWY3DPEF\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&path).unwrap(), "legacy 6 JBSWY3DPEF======\n");
}

#[test]
fn test_name_with_space_rejected() {
    let (_dir, path) = scratch();

    let output = twofa(&path, &["--add", "two words"], &format!("{}\n", RFC_SECRET));
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2fa: name must not contain spaces"));
    assert!(!path.exists());
}

#[test]
fn test_usage_errors_exit_2() {
    let (_dir, path) = scratch();

    for args in [
        &["--add", "-7", "-8", "github"][..],
        &["--clip"][..],
        &["--list", "github"][..],
        &["one", "two"][..],
    ] {
        let output = twofa(&path, args, "");
        assert_eq!(output.status.code(), Some(2), "args: {:?}", args);
    }
}

#[test]
fn test_keychain_flag_overrides_environment() {
    let (dir, path) = scratch();
    let other = dir.path().join("other");
    fs::write(&other, format!("work 6 {}\n", RFC_SECRET)).unwrap();

    let output = twofa(&path, &["--keychain", other.to_str().unwrap(), "--list"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "work\n");
}
