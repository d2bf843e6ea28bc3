use std::fmt;
use std::str::FromStr;

use crate::runtime::RunState;
use crate::symbol::{data_index, Addr};

/// Every mnemonic understood by the interpreter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Opcode {
    Dec,
    Ldi,
    Lda,
    Str,
    Xch,
    Add,
    Sub,
    Jmp,
    Jzs,
    Jvs,
    Hlt,
}

/// What an opcode expects after its mnemonic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandKind {
    None,
    /// Label naming a data memory address
    Symbol,
    /// Signed 32-bit decimal literal
    Literal,
    /// Instruction memory address, as a signed 32-bit decimal
    Address,
}

impl Opcode {
    pub const ALL: [Opcode; 11] = [
        Opcode::Dec,
        Opcode::Ldi,
        Opcode::Lda,
        Opcode::Str,
        Opcode::Xch,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Jmp,
        Opcode::Jzs,
        Opcode::Jvs,
        Opcode::Hlt,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Dec => "DEC",
            Opcode::Ldi => "LDI",
            Opcode::Lda => "LDA",
            Opcode::Str => "STR",
            Opcode::Xch => "XCH",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Jmp => "JMP",
            Opcode::Jzs => "JZS",
            Opcode::Jvs => "JVS",
            Opcode::Hlt => "HLT",
        }
    }

    pub fn operand_kind(&self) -> OperandKind {
        match self {
            Opcode::Dec | Opcode::Lda | Opcode::Str => OperandKind::Symbol,
            Opcode::Ldi => OperandKind::Literal,
            Opcode::Jmp | Opcode::Jzs | Opcode::Jvs => OperandKind::Address,
            Opcode::Xch | Opcode::Add | Opcode::Sub | Opcode::Hlt => OperandKind::None,
        }
    }
}

impl FromStr for Opcode {
    type Err = ();

    /// Mnemonics are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .into_iter()
            .find(|opcode| opcode.mnemonic() == s)
            .ok_or(())
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A single decoded instruction with its operand.
///
/// Instructions never change after loading. Executing one mutates a [`RunState`] and reports
/// whether the program counter should move on to the next slot.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// Declare a variable, clearing its memory
    Dec { symbol: String },
    /// Load an immediate value into the accumulator
    Ldi { value: i32 },
    /// Load a variable into the accumulator
    Lda { symbol: String },
    /// Store the accumulator into a variable
    Str { symbol: String },
    /// Swap accumulator and data register
    Xch,
    /// Accumulator += data register
    Add,
    /// Accumulator -= data register
    Sub,
    /// Unconditional jump. Targets outside instruction memory are only caught at fetch.
    Jmp { target: i32 },
    /// Jump if zero bit is set
    Jzs { target: i32 },
    /// Jump if overflow bit is set
    Jvs { target: i32 },
    /// Stop the machine
    Hlt,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Dec { .. } => Opcode::Dec,
            Self::Ldi { .. } => Opcode::Ldi,
            Self::Lda { .. } => Opcode::Lda,
            Self::Str { .. } => Opcode::Str,
            Self::Xch => Opcode::Xch,
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::Jmp { .. } => Opcode::Jmp,
            Self::Jzs { .. } => Opcode::Jzs,
            Self::Jvs { .. } => Opcode::Jvs,
            Self::Hlt => Opcode::Hlt,
        }
    }

    /// Run against `state`. Returns `true` if the program counter should be incremented
    /// afterwards, `false` if the instruction has already placed it (or halted).
    pub fn execute(&self, state: &mut RunState) -> bool {
        match self {
            Self::Dec { symbol } => {
                let addr = state.symbols.convert(symbol);
                if let Some(word) = state.data_mut(addr) {
                    *word = 0;
                }
                true
            }
            Self::Ldi { value } => {
                state.acc = *value;
                true
            }
            Self::Lda { symbol } => {
                let addr = state.symbols.convert(symbol);
                if let Some(word) = state.data_at(addr) {
                    state.acc = word;
                }
                true
            }
            Self::Str { symbol } => {
                let addr = state.symbols.convert(symbol);
                let acc = state.acc;
                if let Some(word) = state.data_mut(addr) {
                    *word = acc;
                }
                true
            }
            Self::Xch => {
                std::mem::swap(&mut state.acc, &mut state.data_reg);
                true
            }
            Self::Add => {
                let sum = state.acc as i64 + state.data_reg as i64;
                state.set_arithmetic_result(sum);
                true
            }
            Self::Sub => {
                let difference = state.acc as i64 - state.data_reg as i64;
                state.set_arithmetic_result(difference);
                true
            }
            Self::Jmp { target } => {
                state.pc = *target;
                false
            }
            Self::Jzs { target } => Self::branch(&mut state.pc, state.zero, *target),
            Self::Jvs { target } => Self::branch(&mut state.pc, state.overflow, *target),
            Self::Hlt => {
                state.halted = true;
                false
            }
        }
    }

    #[inline]
    fn branch(pc: &mut i32, condition: bool, target: i32) -> bool {
        if condition {
            *pc = target;
        }
        !condition
    }
}

impl RunState {
    /// Word of data memory at `addr`, if it is backed by memory.
    fn data_mut(&mut self, addr: Addr) -> Option<&mut i32> {
        data_index(addr).map(|index| &mut self.data[index])
    }

    /// Store the (wide) result of ADD or SUB, overwriting both flags.
    ///
    /// Overflow is judged on the exact result; the accumulator receives the low 32 bits.
    fn set_arithmetic_result(&mut self, result: i64) {
        self.overflow = result > i32::MAX as i64 || result < i32::MIN as i64;
        self.acc = result as i32;
        self.zero = self.acc == 0;
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opcode = self.opcode();
        match self {
            Self::Dec { symbol } | Self::Lda { symbol } | Self::Str { symbol } => {
                write!(f, "{} {}", opcode, symbol)
            }
            Self::Ldi { value } => write!(f, "{} {}", opcode, value),
            Self::Jmp { target } | Self::Jzs { target } | Self::Jvs { target } => {
                write!(f, "{} {}", opcode, target)
            }
            Self::Xch | Self::Add | Self::Sub | Self::Hlt => write!(f, "{}", opcode),
        }
    }
}
