mod command;
mod reader;

pub use self::command::Command;
use self::reader::{CommandReader, Read as _};
use crate::output::{self, Output};
use crate::runtime::Machine;

/// Leave this as a struct, in case more options are added in the future.
#[derive(Debug, Default)]
pub struct PromptOptions {
    /// Commands to run before reading from stdin, separated by `;` or newlines.
    pub command: Option<String>,
}

/// Interactive command loop around a loaded [`Machine`].
///
/// Ends when the machine halts, on `quit`, or at end of input.
pub struct Prompt {
    reader: CommandReader,
}

impl Prompt {
    pub fn new(opts: PromptOptions) -> Self {
        Self {
            reader: CommandReader::from(opts.command),
        }
    }

    pub fn run(&mut self, machine: &mut Machine) {
        loop {
            // Convert EOF to `quit`
            let command = self.next_command().unwrap_or(Command::Quit);

            match command {
                Command::Quit => {
                    dprintln!(Always, "Good bye.");
                    break;
                }
                Command::Help => {
                    dprintln!(Always, "\n{}", include_str!("./help.txt"));
                }
                Command::Print => Output::Normal.print_state(machine),
                Command::Step => {
                    machine.step_once();
                    Output::Normal.print_state(machine);
                    if machine.hit_limit() {
                        output::report_limit(machine);
                    }
                }
                Command::All => {
                    let exit = machine.run_to_halt();
                    Output::Normal.print_state(machine);
                    output::report_exit(machine, exit);
                }
            }

            if machine.halted() {
                break;
            }
        }
    }

    /// Returns `None` on EOF.
    fn next_command(&mut self) -> Option<Command> {
        // Loop until valid command or EOF
        loop {
            let line = self.reader.read()?.trim();
            if line.is_empty() {
                continue;
            }

            match Command::try_from(line) {
                Ok(command) => return Some(command),
                Err(error) => {
                    dprintln!(Always, "{}", error);
                    dprintln!(Always, "Type `help` for a list of commands.");
                }
            }
        }
    }
}
