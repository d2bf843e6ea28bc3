use std::cell::RefCell;
use std::str::Chars;

use colored::{ColoredString, Colorize};

use crate::runtime::{Exit, Machine};

#[macro_export]
macro_rules! dprint {
    ( $cond:expr, $fmt:literal $($tt:tt)* ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        let s = format!(
            $fmt
            $($tt)*
        );
        $crate::output::Output::Debugger($cond).print_str(&s);
    }};
    // Trigger type error if missing condition
    ( $fmt:literal $($tt:tt)* ) => {{
        $crate::output::Output::Debugger($fmt);
    }};
}

#[macro_export]
macro_rules! dprintln {
    ( $cond:expr ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        $crate::output::Output::Debugger($cond).print_str("\n");
    }};
    ( $cond:expr, $fmt:literal $($tt:tt)* ) => {{
        #[allow(unused_imports)]
        use $crate::output::Condition::*;
        let s = format!(
            concat!($fmt, "\n")
            $($tt)*
        );
        $crate::output::Output::Debugger($cond).print_str(&s);
    }};
    // Trigger type error if missing condition
    ( $fmt:literal $($tt:tt)* ) => {{
        $crate::output::Output::Debugger($fmt);
    }};
}

/// Program state goes to stdout, everything the interpreter says about it goes to stderr.
#[derive(Clone, Copy, Debug)]
pub enum Output {
    Normal,
    Debugger(Condition),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Printed even with `--minimal`, without color.
    Always,
    /// Hidden with `--minimal`.
    Sometimes,
}

struct Decolored<'a> {
    chars: Chars<'a>,
}

impl Output {
    thread_local! {
        static IS_MINIMAL: RefCell<bool> = const { RefCell::new(false) };
    }

    pub fn set_minimal(new_value: bool) -> bool {
        Self::IS_MINIMAL.with(|value| value.replace(new_value))
    }
    pub fn is_minimal() -> bool {
        Self::IS_MINIMAL.with(|value| *value.borrow())
    }

    pub fn print_str(&self, string: &str) {
        match self {
            Self::Normal => {
                if Self::is_minimal() {
                    print_colorless(string);
                } else {
                    print!("{}", string);
                }
            }

            Self::Debugger(condition) => match (Self::is_minimal(), *condition) {
                (false, _) => eprint!("{}", ColoredString::from(string).blue()),
                // Always remove color if `--minimal`
                (true, Condition::Always) => eprint_colorless(string),
                (true, Condition::Sometimes) => (),
            },
        }
    }

    fn print_heading(&self, title: &str) {
        self.print_str(&format!("{}\n", format!("------- {title} -------").bold()));
    }

    /// Instruction memory, registers, then data memory.
    pub fn print_state(&self, machine: &Machine) {
        self.print_instructions(machine);
        self.print_registers(machine);
        self.print_data(machine);
    }

    pub fn print_instructions(&self, machine: &Machine) {
        self.print_heading("Instruction Memory");
        for (addr, instr) in machine.instructions() {
            let marker = if i32::from(addr) == machine.pc() && !machine.halted() {
                "-->".green()
            } else {
                "   ".normal()
            };
            if Self::is_minimal() {
                self.print_str(&format!("{}: {}\n", addr, instr));
            } else {
                self.print_str(&format!("{} {:>3}: {}\n", marker, addr, instr));
            }
        }
    }

    pub fn print_registers(&self, machine: &Machine) {
        let rows = [
            ("Accumulator", machine.accumulator().to_string()),
            ("Data Register", machine.data_register().to_string()),
            ("Program Counter", machine.pc().to_string()),
            ("Zero Bit", bit(machine.zero())),
            ("Overflow Bit", bit(machine.overflow())),
        ];

        if Self::is_minimal() {
            self.print_heading("Registers");
            for (name, value) in rows {
                self.print_str(&format!("{:<15}: {}\n", name, value));
            }
            return;
        }

        self.print_str("\x1b[2m┌──────────────────────────────┐\x1b[0m\n");
        for (name, value) in rows {
            self.print_str("\x1b[2m│\x1b[0m");
            self.print_str(&format!(" \x1b[1m{:<15}\x1b[0m {:>12}", name, value));
            self.print_str(" \x1b[2m│\x1b[0m\n");
        }
        self.print_str("\x1b[2m└──────────────────────────────┘\x1b[0m\n");
    }

    /// Every labelled or non-zero data word, as `addr label: value`.
    pub fn print_data(&self, machine: &Machine) {
        self.print_heading("Data Memory");
        for (addr, symbol, value) in machine.data_entries() {
            match symbol {
                Some(symbol) => self.print_str(&format!("{} {}: {}\n", addr, symbol.cyan(), value)),
                None => self.print_str(&format!("{} {}\n", addr, value)),
            }
        }
    }
}

/// Say why the machine stopped.
pub fn report_exit(machine: &Machine, exit: Exit) {
    match exit {
        Exit::Halted => dprintln!(Always, "Halted."),
        Exit::LimitReached => report_limit(machine),
        Exit::OutOfProgram => dprintln!(
            Always,
            "Program counter left instruction memory at {}. Stopping.",
            machine.pc()
        ),
    }
}

pub fn report_limit(machine: &Machine) {
    dprintln!(
        Always,
        "{} instructions reached! Terminating ...",
        machine.limit()
    );
}

fn bit(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

impl<'a> Decolored<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            chars: string.chars(),
        }
    }
}

impl<'a> Iterator for Decolored<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            // Skip everything between '\x1b' and 'm' (inclusive)
            if ch == '\x1b' {
                while self.chars.next().is_some_and(|ch| ch != 'm') {}
                continue;
            }
            return Some(ch);
        }
        None
    }
}

fn eprint_colorless(string: &str) {
    eprint!("{}", Decolored::new(string).collect::<String>());
}

fn print_colorless(string: &str) {
    print!("{}", Decolored::new(string).collect::<String>());
}
