use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.assert().success().stdout(contains("~ ali v"));
}

#[test]
fn runs_sum() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/sum.asm").arg("--minimal");

    cmd.assert()
        .success()
        .stdout(contains("------- Instruction Memory -------\n0: LDI 3\n1: XCH\n"))
        .stdout(contains("Accumulator    : 8\n"))
        .stdout(contains("Data Register  : 3\n"))
        .stdout(contains("Program Counter: 7\n"))
        .stdout(contains("------- Data Memory -------\n128 x: 8\n"))
        .stderr(contains("Halted."));
}

#[test]
fn minimal_hides_status_messages() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/sum.asm").arg("--minimal");
    cmd.assert()
        .success()
        .stdout(contains("Loading").not())
        .stdout(contains("Completed").not());

    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("tests/files/sum.asm");
    cmd.assert()
        .success()
        .stdout(contains("Loading"))
        .stdout(contains("Completed"));
}

#[test]
fn sets_overflow_bit() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/overflow.asm").arg("--minimal");

    cmd.assert()
        .success()
        .stdout(contains("Accumulator    : -2147483648\n"))
        .stdout(contains("Zero Bit       : 0\n"))
        .stdout(contains("Overflow Bit   : 1\n"))
        .stdout(contains("128 wrapped: -2147483648\n"));
}

#[test]
fn counts_down() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/countdown.asm").arg("--minimal");

    cmd.assert()
        .success()
        .stdout(contains("128 total: 10\n"))
        .stdout(contains("129 n: 0\n"))
        .stdout(contains("Zero Bit       : 1\n"));
}

#[test]
fn stops_runaway_program() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/loop.asm").arg("--minimal");
    cmd.assert()
        .success()
        .stderr(contains("1000 instructions reached! Terminating ..."));

    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run")
        .arg("tests/files/loop.asm")
        .arg("--minimal")
        .arg("--limit")
        .arg("50");
    cmd.assert()
        .success()
        .stderr(contains("50 instructions reached! Terminating ..."));
}

#[test]
fn skips_unknown_opcodes() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/unknown.asm").arg("--minimal");

    cmd.assert()
        .success()
        .stdout(contains("0: LDI 6\n2: XCH\n3: HLT\n"))
        .stdout(contains("FOO").not())
        .stdout(contains("Data Register  : 6\n"));
}

#[test]
fn traces_instructions() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.env("ALI_TRACE", "1")
        .arg("run")
        .arg("tests/files/sum.asm")
        .arg("--minimal");

    cmd.assert()
        .success()
        .stderr(contains("[  0] LDI 3\n"))
        .stderr(contains("[  7] HLT\n"));
}

#[test]
fn checks_program() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("check").arg("tests/files/sum.asm");
    cmd.assert()
        .success()
        .stdout(contains("no errors found, 8 instructions"));
}

#[test]
fn rejects_bad_literal() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("check").arg("tests/files/bad_literal.asm");
    cmd.assert()
        .failure()
        .stderr(contains("invalid integer"))
        .stderr(contains("load::bad_int"));

    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/bad_literal.asm").arg("--minimal");
    cmd.assert()
        .failure()
        .stdout(contains("Registers").not())
        .stdout(contains("Failed").not());

    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/bad_literal.asm");
    cmd.assert()
        .failure()
        .stdout(contains("Failed"))
        .stdout(contains("Running").not());
}

#[test]
fn jumps_out_of_program() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/far_jump.asm").arg("--minimal");
    cmd.assert()
        .success()
        .stdout(contains("Program Counter: 70000\n"))
        .stderr(contains("Program counter left instruction memory at 70000. Stopping."));
}

#[test]
fn missing_file_fails() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("run").arg("tests/files/does_not_exist.asm");
    cmd.assert().failure();
}
