//! End-to-end tests driving the compiled binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

struct CommandResult {
    stdout: String,
    stderr: String,
    exit_code: i32,
}

/// Run the binary with NO_COLOR set so output is byte-stable.
fn klondiff(args: &[&str]) -> CommandResult {
    klondiff_with_stdin(args, None)
}

fn klondiff_with_stdin(args: &[&str], stdin: Option<&[u8]>) -> CommandResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_klondiff"));
    cmd.args(args)
        .env("NO_COLOR", "1")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    let mut child = cmd.spawn().expect("spawn klondiff");
    if let Some(input) = stdin {
        child
            .stdin
            .as_mut()
            .expect("stdin piped")
            .write_all(input)
            .unwrap();
    }
    let out = child.wait_with_output().expect("wait for klondiff");
    CommandResult {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        exit_code: out.status.code().unwrap_or(-1),
    }
}

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn diffs_two_text_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"one\ntwo\nthree\n");
    let b = write_file(dir.path(), "b.txt", b"one\n2\nthree\n");
    let result = klondiff(&["--patience", &a, &b]);
    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    let expected = format!(
        "--- {a}\n+++ {b}\n@@ -1,3 +1,3 @@\n one\n-two\n+2\n three\n"
    );
    assert_eq!(result.stdout, expected);
}

#[test]
fn identical_files_produce_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"same\ncontent\n");
    let b = write_file(dir.path(), "b.txt", b"same\ncontent\n");
    let result = klondiff(&[&a, &b]);
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.is_empty());
}

#[test]
fn same_path_twice_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"anything\n");
    let result = klondiff(&[&a, &a]);
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.is_empty());
}

#[test]
fn binary_files_that_differ_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", b"\x00\x01\x02\x03");
    let b = write_file(dir.path(), "b.bin", b"\x00\x01\x02\x04");
    let result = klondiff(&[&a, &b]);
    assert_eq!(result.exit_code, 2);
    assert_eq!(
        result.stdout,
        format!("Binary files {a} and {b} differ\n")
    );
}

#[test]
fn identical_binary_files_exit_0() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.bin", b"\x00\x01\x02\x03");
    let b = write_file(dir.path(), "b.bin", b"\x00\x01\x02\x03");
    let result = klondiff(&[&a, &b]);
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.is_empty());
}

#[test]
fn missing_operand_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"x\n");
    let result = klondiff(&[&a, &a, &a]);
    assert_eq!(result.exit_code, 2);
    assert!(result.stderr.contains("You must supply 2 filenames"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"x\n");
    let missing = dir.path().join("nope.txt");
    let result = klondiff(&[&a, &missing.to_string_lossy()]);
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.contains("cannot read"));
}

#[test]
fn reads_standard_input() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"left\n");
    let result = klondiff_with_stdin(&[&a, "-"], Some(b"right\n"));
    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("-left\n"));
    assert!(result.stdout.contains("+right\n"));
}

#[test]
fn klondike_is_the_default_for_this_binary_name() {
    // two adjacent whitespace-only rewrites: klondike pairs each line
    // with its rewrite, patience lumps them into one replaced region
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"alpha one\nbeta two\n");
    let b = write_file(dir.path(), "b.txt", b"alphaone\nbetatwo\n");
    let with_flag = klondiff(&["--klondike", &a, &b]);
    let patience = klondiff(&["--patience", &a, &b]);
    let default = klondiff(&[&a, &b]);
    assert_eq!(default.stdout, with_flag.stdout);
    assert_ne!(default.stdout, patience.stdout);
    assert!(with_flag
        .stdout
        .contains("-alpha one\n+alphaone\n-beta two\n+betatwo\n"));
    assert!(patience
        .stdout
        .contains("-alpha one\n-beta two\n+alphaone\n+betatwo\n"));
}

#[test]
fn difflib_flag_selects_the_classical_matcher() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"one\ntwo\nthree\n");
    let b = write_file(dir.path(), "b.txt", b"one\nTWO\nthree\n");
    let result = klondiff(&["--difflib", &a, &b]);
    assert_eq!(result.exit_code, 0);
    assert!(result.stdout.contains("-two\n"));
    assert!(result.stdout.contains("+TWO\n"));
}

#[test]
fn conflicting_matcher_flags_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"x\n");
    let result = klondiff(&["--patience", "--klondike", &a, &a]);
    assert_ne!(result.exit_code, 0);
}

#[test]
fn git_external_diff_form_synthesizes_headers() {
    let dir = tempfile::tempdir().unwrap();
    let old_blob = write_file(dir.path(), "old-blob", b"one\ntwo\n");
    let new_blob = write_file(dir.path(), "new-blob", b"one\n2\n");
    let result = klondiff(&[
        "src/lib.rs",
        &old_blob,
        "0123456789abcdef",
        "100644",
        &new_blob,
        "fedcba9876543210",
        "100644",
    ]);
    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert!(result
        .stdout
        .starts_with("diff --git a/src/lib.rs b/src/lib.rs\nindex 0123456..fedcba9 100644\n"));
    assert!(result.stdout.contains("--- a/src/lib.rs\n"));
    assert!(result.stdout.contains("+++ b/src/lib.rs\n"));
    assert!(result.stdout.contains("-two\n"));
    assert!(result.stdout.contains("+2\n"));
}

#[test]
fn git_rename_form_passes_metadata_through() {
    let dir = tempfile::tempdir().unwrap();
    let old_blob = write_file(dir.path(), "old-blob", b"body\n");
    let new_blob = write_file(dir.path(), "new-blob", b"body\n");
    let result = klondiff(&[
        "old/name.txt",
        &old_blob,
        "0123456789abcdef",
        "100644",
        &new_blob,
        "fedcba9876543210",
        "100644",
        "new/name.txt",
        "similarity index 100%",
    ]);
    assert_eq!(result.exit_code, 0);
    assert_eq!(
        result.stdout,
        "diff --git a/old/name.txt b/new/name.txt\nsimilarity index 100%\n"
    );
}

#[test]
fn missing_trailing_newline_is_annotated() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"line\n");
    let b = write_file(dir.path(), "b.txt", b"line\nnew");
    let result = klondiff(&[&a, &b]);
    assert_eq!(result.exit_code, 0);
    assert!(result
        .stdout
        .contains("+new\n\\ No newline at end of file\n"));
}
