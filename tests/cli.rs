use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn rowfilter() -> Command {
    Command::cargo_bin("rowfilter").expect("binary builds")
}

#[test]
fn filters_and_projects_columns() {
    rowfilter()
        .args(["--filter", "age > 20", "--columns", "name"])
        .write_stdin("name,age\nalice,30\nbob,15\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("name\nalice\n"));
}

#[test]
fn passes_every_row_without_a_filter() {
    rowfilter().write_stdin("a,b\n1,2\n3,4\n").assert().success().stdout(predicate::str::diff("a,b\n1,2\n3,4\n"));
}

#[test]
fn no_header_synthesises_column_names() {
    rowfilter()
        .args(["--no-header", "--filter", "col0 == \"x\""])
        .write_stdin("x,1\ny,2\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("x,1\n"));
}

#[test]
fn bad_filter_expression_is_reported_and_exits_nonzero() {
    rowfilter()
        .args(["--filter", "(1 + 2"])
        .write_stdin("a\n1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unmatched bracket"));
}

#[test]
fn unknown_projected_column_is_an_error() {
    rowfilter()
        .args(["--columns", "nope"])
        .write_stdin("a,b\n1,2\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn reads_from_a_file_argument_instead_of_stdin() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    write!(file, "a,b\n1,2\n3,4\n").expect("write temp file");

    rowfilter().arg(file.path()).assert().success().stdout(predicate::str::diff("a,b\n1,2\n3,4\n"));
}

#[test]
fn quoted_fields_round_trip() {
    rowfilter()
        .write_stdin("name,note\nalice,\"says \"\"hi\"\", bob\"\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("name,note\nalice,\"says \"\"hi\"\", bob\"\n"));
}

#[test]
fn show_headers_prints_aliases_and_exits_without_filtering() {
    rowfilter()
        .args(["--show-headers"])
        .write_stdin("a,1st place\n1,2\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("0: a\n1: 1st place (_1st_place)\n"));
}

#[test]
fn quoted_numeric_field_is_never_treated_as_a_number() {
    rowfilter()
        .args(["--filter", "a == 42"])
        .write_stdin("a\n\"42\"\n42\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("a\n42\n"));
}
