// Loading
mod parser;
pub use parser::{AsmParser, Program};
mod error;
pub use error::LoadError;

// Running
mod instruction;
pub use instruction::{Instruction, Opcode, OperandKind};
mod runtime;
pub use runtime::{Exit, Machine, RunState, DEFAULT_INSTRUCTION_LIMIT};
mod symbol;
pub use symbol::{Addr, SymbolTable, DATA_RANGE, DATA_SIZE, DATA_START, PROGRAM_SIZE};

// Interaction
#[macro_use]
pub mod output;
mod prompt;
pub use prompt::{Prompt, PromptOptions};

pub mod env;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
