//! End-to-end tests driving the `lovela` binary through stdin/stdout and
//! the file-based flags, per the CLI contract.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn lovela() -> Command {
    Command::cargo_bin("lovela").unwrap()
}

#[test]
fn reads_from_stdin_and_writes_to_stdout_by_default() {
    lovela()
        .write_stdin("func: + 1.")
        .assert()
        .success()
        .stdout(predicate::str::contains("f_func"))
        .stdout(predicate::str::contains("const auto v2 = v1 + 1;"))
        .stdout(predicate::str::contains("return v2;"));
}

#[test]
fn reads_from_explicit_dash_as_stdin() {
    lovela()
        .arg("-")
        .write_stdin("func: + 1.")
        .assert()
        .success()
        .stdout(predicate::str::contains("f_func"));
}

#[test]
fn reads_from_an_input_file() {
    let mut file = tempfile::Builder::new().suffix(".lovela").tempfile().unwrap();
    write!(file, "func: + 1.").unwrap();

    lovela()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("f_func"));
}

#[test]
fn writes_generated_program_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("program.cpp");

    lovela()
        .arg("--output")
        .arg(&out_path)
        .write_stdin("func: + 1.")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.contains("f_func"));
}

#[test]
fn writes_companion_headers_only_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let imports_path = dir.path().join("imports.h");
    let exports_path = dir.path().join("exports.h");

    lovela()
        .arg("--imports-header")
        .arg(&imports_path)
        .arg("--exports-header")
        .arg(&exports_path)
        .write_stdin("<- [#32] ex [#32]: + 1.")
        .assert()
        .success();

    let exports = std::fs::read_to_string(&exports_path).unwrap();
    assert!(exports.contains("ex"));

    assert!(imports_path.exists());
}

#[test]
fn standard_import_populates_imports_header_with_mapped_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let imports_path = dir.path().join("imports.h");

    lovela()
        .arg("--imports-header")
        .arg(&imports_path)
        .write_stdin("-> 'Standard C' puts.")
        .assert()
        .success();

    let imports = std::fs::read_to_string(&imports_path).unwrap();
    assert!(imports.contains("stdio.h"));
}

#[test]
fn exit_code_is_zero_when_no_error_diagnostic_was_recorded() {
    lovela().write_stdin("func: + 1.").assert().success().code(0);
}

#[test]
fn exit_code_is_nonzero_when_an_error_diagnostic_was_recorded() {
    lovela()
        .write_stdin("<- [InvalidType] ex: + 1.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn diagnostic_is_pretty_printed_with_location_and_source_excerpt() {
    lovela()
        .write_stdin("<- [InvalidType] ex: + 1.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("-->"))
        .stderr(predicate::str::contains("ex: + 1."));
}

#[test]
fn verbose_flag_is_accepted_without_affecting_stdout() {
    lovela()
        .arg("-vv")
        .write_stdin("func: + 1.")
        .assert()
        .success()
        .stdout(predicate::str::contains("f_func"));
}

#[test]
fn dialect_flag_is_accepted() {
    lovela()
        .arg("--dialect")
        .arg("cpp")
        .write_stdin("func: + 1.")
        .assert()
        .success();
}
