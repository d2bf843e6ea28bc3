use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use ali::output::{self, Output};
use ali::{Machine, Prompt, PromptOptions, DEFAULT_INSTRUCTION_LIMIT};

/// Ali is an interpreter and step debugger for a tiny accumulator-machine assembly language.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a program file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program until it halts and print the final machine state
    Run {
        /// Program file to run
        name: PathBuf,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Instructions to execute before assuming the program is stuck
        #[arg(short, long, default_value_t = DEFAULT_INSTRUCTION_LIMIT)]
        limit: u32,
    },
    /// Load a program and step through it with the interactive prompt
    Debug {
        /// Program file to debug
        name: PathBuf,
        /// Read prompt commands from argument, separated by `;`
        #[arg(short, long)]
        command: Option<String>,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Instructions to execute before assuming the program is stuck
        #[arg(short, long, default_value_t = DEFAULT_INSTRUCTION_LIMIT)]
        limit: u32,
    },
    /// Check a program file loads, without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    ali::env::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(ali::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                minimal,
                limit,
            } => run(&name, minimal, limit),
            Command::Debug {
                name,
                command,
                minimal,
                limit,
            } => {
                Output::set_minimal(minimal);
                let mut machine = load(&name, limit)?;
                message(Green, "Debugging", "type `help` for a list of commands");
                Prompt::new(PromptOptions { command }).run(&mut machine);
                file_message(Green, "Completed", &name);
                Ok(())
            }
            Command::Check { name } => {
                let machine = load(&name, DEFAULT_INSTRUCTION_LIMIT)?;
                let count = machine.instructions().count();
                message(
                    Green,
                    "Success",
                    &format!(
                        "no errors found, {} instruction{}",
                        count,
                        if count == 1 { "" } else { "s" }
                    ),
                );
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, false, DEFAULT_INSTRUCTION_LIMIT)
    } else {
        println!("\n~ ali v{VERSION} ~");
        println!("{SHORT_INFO}");
        Ok(())
    }
}

enum MsgColor {
    Green,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    if Output::is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(name: &Path, minimal: bool, limit: u32) -> Result<()> {
    Output::set_minimal(minimal);
    let mut machine = load(name, limit)?;

    message(MsgColor::Green, "Running", "loaded program");
    let exit = machine.run_to_halt();
    Output::Normal.print_state(&machine);
    output::report_exit(&machine, exit);

    file_message(MsgColor::Green, "Completed", name);
    Ok(())
}

/// Read and load a program file, reporting load errors against the file contents.
fn load(name: &Path, limit: u32) -> Result<Machine> {
    file_message(MsgColor::Green, "Loading", name);
    let contents = fs::read_to_string(name).into_diagnostic()?;

    let mut machine = Machine::with_limit(limit);
    machine.load(&contents).map_err(|error| {
        file_message(MsgColor::Red, "Failed", name);
        error.report(&contents)
    })?;
    machine.set_trace(ali::env::is_trace_enabled());
    Ok(machine)
}

const SHORT_INFO: &str = r"
Welcome to ali, an interpreter for a small accumulator machine:
two registers, two flags, 128 instruction slots and 128 words of data.
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
