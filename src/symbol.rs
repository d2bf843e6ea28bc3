use std::ops::Range;

use indexmap::IndexMap;

/// Address into either instruction memory or data memory.
pub type Addr = u16;

/// Number of instruction slots, addressed `0..128`.
pub const PROGRAM_SIZE: usize = 128;

/// Number of data words, addressed `128..256`.
pub const DATA_SIZE: usize = 128;

/// First address of data memory. Symbols are allocated upwards from here.
pub const DATA_START: Addr = PROGRAM_SIZE as Addr;

/// Every valid data memory address.
pub const DATA_RANGE: Range<Addr> = DATA_START..DATA_START + DATA_SIZE as Addr;

/// Label -> data address, allocated lazily in order of first mention.
///
/// Since addresses are handed out sequentially, the insertion index of a label *is* its offset
/// into data memory. This gives the reverse lookup (address -> label) for free.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    table: IndexMap<String, Addr>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a label to its address, allocating the next free address on first use.
    ///
    /// Allocation never fails. Once more labels exist than data memory can hold, the returned
    /// address lies past the end of [`DATA_RANGE`] and memory accesses through it are ignored.
    pub fn convert(&mut self, label: &str) -> Addr {
        if let Some(addr) = self.table.get(label) {
            return *addr;
        }
        let addr = DATA_START.saturating_add(self.table.len() as Addr);
        self.table.insert(label.to_string(), addr);
        addr
    }

    /// Address of an already-declared label.
    pub fn get(&self, label: &str) -> Option<Addr> {
        self.table.get(label).copied()
    }

    /// Label declared at a data address, if any.
    pub fn symbol_at(&self, addr: Addr) -> Option<&str> {
        let index = addr.checked_sub(DATA_START)?;
        self.table
            .get_index(index as usize)
            .map(|(label, _)| label.as_str())
    }
}

/// Index into data memory, if `addr` falls inside it.
pub fn data_index(addr: Addr) -> Option<usize> {
    DATA_RANGE
        .contains(&addr)
        .then(|| (addr - DATA_START) as usize)
}
