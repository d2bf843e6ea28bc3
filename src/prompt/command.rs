use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Execute one instruction and print the machine.
    Step,
    /// Execute until halt (or instruction limit) and print the machine.
    All,
    /// Print the machine without executing anything.
    Print,
    Quit,
}

#[rustfmt::skip]
const COMMANDS: &[(Command, &[&str])] = &[
    (Command::Help,  &["help", "h", "?"]),
    (Command::Step,  &["step", "s"]),
    (Command::All,   &["all", "a"]),
    (Command::Print, &["print", "p"]),
    (Command::Quit,  &["quit", "q", "exit"]),
];

impl Command {
    fn name(&self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(command, _)| command == self)
            .map(|(_, names)| names[0])
            .unwrap_or("?")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error parsing a command.
#[derive(Debug, PartialEq)]
pub enum Error {
    Invalid {
        command_name: String,
        suggested: Option<Command>,
    },
    TooManyArguments {
        command: Command,
        actual_count: usize,
    },
}

impl StdError for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid {
                command_name,
                suggested,
            } => {
                write!(f, "Not a command: `{}`.", command_name)?;
                if let Some(suggested) = suggested {
                    write!(f, "\n    Did you mean `{}`?", suggested)?;
                }
            }
            Self::TooManyArguments {
                command,
                actual_count,
            } => {
                write!(f, "In command `{}`:", command)?;
                write!(f, "\n    ")?;
                write!(
                    f,
                    "Too many arguments. Expected 0, found {}.",
                    actual_count
                )?;
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Command {
    type Error = Error;

    /// Assumes line is non-empty.
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut words = line.split_whitespace();
        let command_name = words.next().unwrap_or("");

        let Some(command) = find_name_match(command_name) else {
            return Err(Error::Invalid {
                command_name: command_name.to_string(),
                suggested: suggest(command_name),
            });
        };

        let actual_count = words.count();
        if actual_count > 0 {
            return Err(Error::TooManyArguments {
                command,
                actual_count,
            });
        }
        Ok(command)
    }
}

/// Returns the first [`Command`] with an alias matching `name` (case insensitive).
fn find_name_match(name: &str) -> Option<Command> {
    for (command, candidates) in COMMANDS {
        if candidates
            .iter()
            .any(|candidate| name.eq_ignore_ascii_case(candidate))
        {
            return Some(*command);
        }
    }
    None
}

/// Command whose full name starts with `name`, for typos like `ste` or `qui`.
fn suggest(name: &str) -> Option<Command> {
    if name.len() < 2 {
        return None;
    }
    let name = name.to_ascii_lowercase();
    COMMANDS
        .iter()
        .find(|(_, names)| names[0].starts_with(&name) || name.starts_with(names[0]))
        .map(|(command, _)| *command)
}
