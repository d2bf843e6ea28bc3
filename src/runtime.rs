use std::fmt;

use crate::dprintln;
use crate::error::LoadError;
use crate::instruction::Instruction;
use crate::parser::{AsmParser, Program};
use crate::symbol::{data_index, Addr, SymbolTable, DATA_SIZE, DATA_START, PROGRAM_SIZE};

/// Cycles allowed before a program is assumed to be stuck in a loop.
pub const DEFAULT_INSTRUCTION_LIMIT: u32 = 1000;

/// Registers, flags, and data memory. Everything an instruction can touch.
#[derive(Clone, Debug)]
pub struct RunState {
    /// Accumulator
    pub(crate) acc: i32,
    /// Data register, second operand of ADD and SUB
    pub(crate) data_reg: i32,
    /// Program counter. Jumps may place it anywhere, so it is as wide as a jump target.
    pub(crate) pc: i32,
    pub(crate) zero: bool,
    pub(crate) overflow: bool,
    /// Set by HLT or by the instruction limit. Never cleared.
    pub(crate) halted: bool,
    /// Addresses `DATA_START..DATA_START + DATA_SIZE`
    pub(crate) data: [i32; DATA_SIZE],
    pub(crate) symbols: SymbolTable,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            acc: 0,
            data_reg: 0,
            pc: 0,
            zero: false,
            overflow: false,
            halted: false,
            data: [0; DATA_SIZE],
            symbols: SymbolTable::new(),
        }
    }

    /// Word of data memory at `addr`, if it is backed by memory.
    pub fn data_at(&self, addr: Addr) -> Option<i32> {
        data_index(addr).map(|index| self.data[index])
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Why [`Machine::run_to_halt`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// A HLT instruction was executed.
    Halted,
    /// The instruction limit was reached and the machine was halted.
    LimitReached,
    /// The program counter left instruction memory.
    OutOfProgram,
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted => write!(f, "program halted"),
            Self::LimitReached => write!(f, "instruction limit reached"),
            Self::OutOfProgram => write!(f, "program counter left instruction memory"),
        }
    }
}

/// A loaded program together with the state it runs against.
///
/// The cycle counter belongs to the machine rather than to a single run, so repeated calls to
/// [`Machine::run_to_halt`] or [`Machine::step_once`] share one budget of `limit` cycles.
#[derive(Clone, Debug)]
pub struct Machine {
    program: Program,
    state: RunState,
    /// Cycles attempted while not halted.
    cycles: u32,
    limit: u32,
    hit_limit: bool,
    /// Echo every executed instruction.
    trace: bool,
}

impl Machine {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_INSTRUCTION_LIMIT)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            program: Program::empty(),
            state: RunState::new(),
            cycles: 0,
            limit,
            hit_limit: false,
            trace: false,
        }
    }

    /// Parse `src` into instruction memory, starting over from a fresh state.
    ///
    /// Registers, data memory, symbols and the cycle counter are reset. The limit and trace
    /// setting are kept. Nothing is replaced if any line fails to parse.
    pub fn load(&mut self, src: &str) -> Result<(), LoadError> {
        let program = AsmParser::new(src).parse()?;
        self.program = program;
        self.state = RunState::new();
        self.cycles = 0;
        self.hit_limit = false;
        Ok(())
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    /// Perform a single fetch-execute cycle.
    ///
    /// Does nothing once halted. An empty slot is skipped over. A program counter outside
    /// instruction memory leaves the machine untouched, apart from counting the cycle.
    pub fn step_once(&mut self) {
        if self.state.halted {
            return;
        }

        self.cycles += 1;
        if self.cycles >= self.limit {
            self.state.halted = true;
            self.hit_limit = true;
            return;
        }

        let pc = self.state.pc;
        let Some(addr) = program_addr(pc) else {
            return;
        };

        match self.program.get(addr) {
            Some(instr) => {
                if self.trace {
                    dprintln!(Always, "[{:>3}] {}", pc, instr);
                }
                if instr.execute(&mut self.state) {
                    self.state.pc += 1;
                }
            }
            // Fall through empty slot
            None => self.state.pc += 1,
        }
    }

    /// Cycle until halted, limited, or out of instruction memory.
    pub fn run_to_halt(&mut self) -> Exit {
        loop {
            if self.state.halted {
                return if self.hit_limit {
                    Exit::LimitReached
                } else {
                    Exit::Halted
                };
            }
            if program_addr(self.state.pc).is_none() {
                return Exit::OutOfProgram;
            }
            self.step_once();
        }
    }

    pub fn accumulator(&self) -> i32 {
        self.state.acc
    }

    pub fn data_register(&self) -> i32 {
        self.state.data_reg
    }

    pub fn pc(&self) -> i32 {
        self.state.pc
    }

    pub fn zero(&self) -> bool {
        self.state.zero
    }

    pub fn overflow(&self) -> bool {
        self.state.overflow
    }

    pub fn halted(&self) -> bool {
        self.state.halted
    }

    /// Whether the machine was halted by the instruction limit rather than HLT.
    pub fn hit_limit(&self) -> bool {
        self.hit_limit
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.state.symbols
    }

    /// Value stored under a label, if the label has been declared and is backed by memory.
    pub fn variable(&self, label: &str) -> Option<i32> {
        self.state.data_at(self.state.symbols.get(label)?)
    }

    /// Non-empty instruction slots.
    pub fn instructions(&self) -> impl Iterator<Item = (Addr, &Instruction)> {
        self.program.iter()
    }

    /// Data words which are either labelled or non-zero.
    pub fn data_entries(&self) -> impl Iterator<Item = (Addr, Option<&str>, i32)> {
        self.state
            .data
            .iter()
            .enumerate()
            .map(move |(index, value)| {
                let addr = DATA_START + index as Addr;
                (addr, self.state.symbols.symbol_at(addr), *value)
            })
            .filter(|(_, symbol, value)| symbol.is_some() || *value != 0)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Instruction slot for a program counter, if it points into instruction memory.
fn program_addr(pc: i32) -> Option<Addr> {
    Addr::try_from(pc)
        .ok()
        .filter(|addr| (*addr as usize) < PROGRAM_SIZE)
}
