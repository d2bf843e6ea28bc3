use std::io::{self, BufRead as _, IsTerminal as _};

/// Must be ASCII to ensure `.len() == .chars().count()`
pub const PROMPT: &str = "Enter command (s, a, or q): ";

/// Initial capacity of a command buffer.
const INITIAL_BUFFER_CAPACITY: usize = 64;

/// A trait for objects which can yield a command, by iterating a string or reading a stream.
pub trait Read {
    /// `None` indicates EOF.
    /// Returned string slice MAY include leading or trailing whitespace.
    fn read(&mut self) -> Option<&str>;
}

/// Read from argument first, if `Some`. Then read from stdin.
#[derive(Debug)]
pub struct CommandReader {
    argument: Option<Argument>,
    stdin: Stdin,
}

impl CommandReader {
    pub fn from(argument: Option<String>) -> Self {
        Self {
            argument: argument.map(Argument::from),
            stdin: Stdin::new(),
        }
    }
}

impl Read for CommandReader {
    fn read(&mut self) -> Option<&str> {
        if let Some(argument) = &mut self.argument {
            if let Some(command) = argument.read() {
                echo_command(Some(command));
                return Some(command);
            }
        }
        self.stdin.read()
    }
}

/// Command-line argument, split on newlines and semicolons.
#[derive(Debug)]
pub struct Argument {
    buffer: String,
    /// Byte index.
    cursor: usize,
}

impl Argument {
    pub fn from(source: String) -> Self {
        Self {
            buffer: source,
            cursor: 0,
        }
    }
}

impl Read for Argument {
    fn read(&mut self) -> Option<&str> {
        // EOF
        if self.cursor >= self.buffer.len() {
            return None;
        }

        // Take characters until delimiter
        let start = self.cursor;
        let mut chars = self.buffer[self.cursor..].chars();
        while let Some(ch) = chars.next().filter(|ch| *ch != '\n' && *ch != ';') {
            self.cursor += ch.len_utf8();
        }

        let end = self.cursor;
        self.cursor += 1; // sizeof('\n' or ';')

        self.buffer.get(start..end)
    }
}

/// Stdin, either piped or an interactive terminal.
#[derive(Debug)]
pub struct Stdin {
    stdin: io::Stdin,
    is_terminal: bool,
    /// Command must be stored somewhere to be referenced.
    buffer: String,
}

impl Stdin {
    pub fn new() -> Self {
        let stdin = io::stdin();
        Self {
            is_terminal: stdin.is_terminal(),
            stdin,
            buffer: String::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }
}

impl Read for Stdin {
    fn read(&mut self) -> Option<&str> {
        self.buffer.clear();

        if self.is_terminal {
            // Terminal echoes the command itself
            dprint!(Always, "\x1b[1m{}\x1b[0m", PROMPT);
        }
        // Read errors are treated as end of input
        let bytes_read = self.stdin.lock().read_line(&mut self.buffer).unwrap_or(0);

        let command = (bytes_read > 0).then_some(self.buffer.trim_end_matches(['\r', '\n']));
        if !self.is_terminal {
            echo_command(command);
        }
        command
    }
}

/// Print prompt and command.
fn echo_command(command: Option<&str>) {
    if command.is_some_and(|command| command.trim().is_empty()) {
        return;
    }
    dprint!(Sometimes, "\x1b[1m{}", PROMPT);
    dprintln!(
        Sometimes,
        "{}\x1b[0m",
        command.unwrap_or("\x1b[3m(end of input)").trim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_argument() {
        let mut argument = Argument::from("s; a\nq".to_string());
        assert_eq!(argument.read(), Some("s"));
        assert_eq!(argument.read(), Some(" a"));
        assert_eq!(argument.read(), Some("q"));
        assert_eq!(argument.read(), None);
    }

    #[test]
    fn trailing_delimiter() {
        let mut argument = Argument::from("step;".to_string());
        assert_eq!(argument.read(), Some("step"));
        assert_eq!(argument.read(), None);

        let mut argument = Argument::from(";;".to_string());
        assert_eq!(argument.read(), Some(""));
        assert_eq!(argument.read(), Some(""));
        assert_eq!(argument.read(), None);
    }
}
