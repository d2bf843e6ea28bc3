use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn debug(file: &str, commands: &str) -> Command {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("debug")
        .arg(file)
        .arg("--minimal")
        .arg("--command")
        .arg(commands);
    cmd
}

#[test]
fn steps_one_instruction_at_a_time() {
    debug("tests/files/sum.asm", "s;s")
        .assert()
        .success()
        .stdout(contains("Program Counter: 1\n"))
        .stdout(contains("Program Counter: 2\n"))
        .stdout(contains("Program Counter: 3\n").not())
        .stdout(contains("Data Register  : 3\n"))
        // End of input acts as `quit`
        .stderr(contains("Good bye."));
}

#[test]
fn runs_to_halt_and_closes() {
    debug("tests/files/sum.asm", "s;a;s")
        .assert()
        .success()
        .stdout(contains("128 x: 8\n"))
        .stderr(contains("Halted."))
        .stderr(contains("Good bye.").not());
}

#[test]
fn quits_early() {
    debug("tests/files/sum.asm", "q;a")
        .assert()
        .success()
        .stdout(contains("Registers").not())
        .stderr(contains("Good bye."));
}

#[test]
fn reports_invalid_commands() {
    debug("tests/files/sum.asm", "stepp;go;q")
        .assert()
        .success()
        .stderr(contains("Not a command: `stepp`.\n    Did you mean `step`?"))
        .stderr(contains("Not a command: `go`."))
        .stderr(contains("Type `help` for a list of commands."));
}

#[test]
fn prints_help_message() {
    debug("tests/files/sum.asm", "help")
        .assert()
        .success()
        .stderr(contains(include_str!("../src/prompt/help.txt")));
}

#[test]
fn prints_without_executing() {
    debug("tests/files/sum.asm", "p")
        .assert()
        .success()
        .stdout(contains("Program Counter: 0\n"))
        .stdout(contains("Program Counter: 1\n").not());
}

#[test]
fn limit_halts_prompt() {
    debug("tests/files/loop.asm", "a")
        .arg("--limit")
        .arg("5")
        .assert()
        .success()
        .stderr(contains("5 instructions reached! Terminating ..."));

    debug("tests/files/loop.asm", "s;s;s;s")
        .arg("--limit")
        .arg("3")
        .assert()
        .success()
        .stderr(contains("3 instructions reached! Terminating ..."))
        .stderr(contains("Good bye.").not());
}

#[test]
fn reads_commands_from_stdin() {
    let mut cmd = Command::cargo_bin("ali").unwrap();
    cmd.arg("debug")
        .arg("tests/files/sum.asm")
        .arg("--minimal")
        .write_stdin("s\n\ns\nquit\n");

    cmd.assert()
        .success()
        .stdout(contains("Program Counter: 2\n"))
        .stdout(contains("Program Counter: 3\n").not())
        .stderr(contains("Good bye."));
}

#[test]
fn argument_commands_come_before_stdin() {
    let mut cmd = debug("tests/files/sum.asm", "s");
    cmd.write_stdin("a\n");

    cmd.assert()
        .success()
        .stdout(contains("Program Counter: 1\n"))
        .stdout(contains("Program Counter: 7\n"))
        .stderr(contains("Halted."));
}
