use std::ops::Range;
use std::str::FromStr;

use crate::error::LoadError;
use crate::instruction::{Instruction, Opcode, OperandKind};
use crate::symbol::{Addr, PROGRAM_SIZE};

/// Contents of instruction memory. Slot `n` holds the instruction from line `n` of the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    slots: Vec<Option<Instruction>>,
}

impl Program {
    pub fn empty() -> Self {
        Self {
            slots: vec![None; PROGRAM_SIZE],
        }
    }

    pub fn get(&self, addr: Addr) -> Option<&Instruction> {
        self.slots.get(addr as usize)?.as_ref()
    }

    /// Non-empty slots, in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Addr, &Instruction)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(addr, slot)| Some((addr as Addr, slot.as_ref()?)))
    }
}

/// Whitespace-separated word within the source, with its byte range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub offs: usize,
}

impl Word<'_> {
    pub fn span(&self) -> Range<usize> {
        self.offs..self.offs + self.text.len()
    }
}

/// Split a line into words. `offs` is the byte offset of the line within the source.
pub fn tokenize(line: &str, offs: usize) -> impl Iterator<Item = Word<'_>> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let rest = &line[cursor..];
        let start = cursor + (rest.len() - rest.trim_start().len());
        if start >= line.len() {
            return None;
        }
        let len = line[start..]
            .find(|c: char| c.is_whitespace())
            .unwrap_or(line.len() - start);
        cursor = start + len;
        Some(Word {
            text: &line[start..cursor],
            offs: offs + start,
        })
    })
}

/// Turns program text into a [`Program`].
///
/// One instruction per line: a mnemonic followed by at most one operand. Unknown mnemonics and
/// blank lines leave their slot empty. Anything after line 128 is ignored.
pub struct AsmParser<'a> {
    src: &'a str,
}

impl<'a> AsmParser<'a> {
    pub fn new(src: &'a str) -> Self {
        AsmParser { src }
    }

    pub fn parse(&self) -> Result<Program, LoadError> {
        let mut program = Program::empty();
        let mut offs = 0;

        for (index, raw_line) in self.src.split('\n').take(PROGRAM_SIZE).enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            program.slots[index] = Self::parse_line(line, offs, index + 1)?;
            offs += raw_line.len() + 1;
        }

        Ok(program)
    }

    fn parse_line(
        line: &str,
        offs: usize,
        line_no: usize,
    ) -> Result<Option<Instruction>, LoadError> {
        let mut words = tokenize(line, offs);
        let Some(mnemonic) = words.next() else {
            return Ok(None);
        };
        let Ok(opcode) = Opcode::from_str(mnemonic.text) else {
            return Ok(None);
        };

        // Extra operands are ignored
        let operand = words.next();
        let operand = match (opcode.operand_kind(), operand) {
            (OperandKind::None, _) => None,
            (_, Some(operand)) => Some(operand),
            (_, None) => {
                return Err(LoadError::MissingOperand {
                    line: line_no,
                    opcode,
                    span: mnemonic.span(),
                })
            }
        };

        let instr = match (opcode, operand) {
            (Opcode::Dec, Some(word)) => Instruction::Dec {
                symbol: word.text.to_string(),
            },
            (Opcode::Lda, Some(word)) => Instruction::Lda {
                symbol: word.text.to_string(),
            },
            (Opcode::Str, Some(word)) => Instruction::Str {
                symbol: word.text.to_string(),
            },
            (Opcode::Ldi, Some(word)) => Instruction::Ldi {
                value: parse_integer(word, opcode, line_no)?,
            },
            (Opcode::Jmp, Some(word)) => Instruction::Jmp {
                target: parse_integer(word, opcode, line_no)?,
            },
            (Opcode::Jzs, Some(word)) => Instruction::Jzs {
                target: parse_integer(word, opcode, line_no)?,
            },
            (Opcode::Jvs, Some(word)) => Instruction::Jvs {
                target: parse_integer(word, opcode, line_no)?,
            },
            (Opcode::Xch, _) => Instruction::Xch,
            (Opcode::Add, _) => Instruction::Add,
            (Opcode::Sub, _) => Instruction::Sub,
            (Opcode::Hlt, _) => Instruction::Hlt,
            (_, None) => unreachable!("operand presence checked above"),
        };
        Ok(Some(instr))
    }
}

/// Operands of `LDI` and the jumps are both plain `i32`, with no trailing garbage.
fn parse_integer(word: Word, opcode: Opcode, line: usize) -> Result<i32, LoadError> {
    word.text
        .parse()
        .map_err(|error| LoadError::invalid_integer(line, opcode, word.text, word.span(), error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Program, LoadError> {
        AsmParser::new(src).parse()
    }

    #[test]
    fn tokenizes_with_offsets() {
        let words: Vec<_> = tokenize("  LDI\t 42  ", 10).collect();
        assert_eq!(
            words,
            [
                Word { text: "LDI", offs: 12 },
                Word { text: "42", offs: 17 },
            ]
        );
        assert_eq!(tokenize("   ", 0).count(), 0);
        assert_eq!(tokenize("", 0).count(), 0);
    }

    #[test]
    fn parses_every_opcode() {
        let program = parse(
            "DEC x\nLDI -7\nLDA x\nSTR y\nXCH\nADD\nSUB\nJMP 3\nJZS 4\nJVS 5\nHLT",
        )
        .unwrap();
        let expected = [
            Instruction::Dec { symbol: "x".into() },
            Instruction::Ldi { value: -7 },
            Instruction::Lda { symbol: "x".into() },
            Instruction::Str { symbol: "y".into() },
            Instruction::Xch,
            Instruction::Add,
            Instruction::Sub,
            Instruction::Jmp { target: 3 },
            Instruction::Jzs { target: 4 },
            Instruction::Jvs { target: 5 },
            Instruction::Hlt,
        ];
        let actual: Vec<_> = program.iter().map(|(_, instr)| instr.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn slot_matches_line() {
        let program = parse("LDI 1\n\nFOO bar\nldi 2\r\nHLT\r\n").unwrap();
        assert_eq!(program.get(0), Some(&Instruction::Ldi { value: 1 }));
        assert_eq!(program.get(1), None);
        assert_eq!(program.get(2), None);
        assert_eq!(program.get(3), None);
        assert_eq!(program.get(4), Some(&Instruction::Hlt));
        assert_eq!(program.iter().count(), 2);
    }

    #[test]
    fn ignores_extra_operands() {
        let program = parse("ADD 1 2\nSTR x y").unwrap();
        assert_eq!(program.get(0), Some(&Instruction::Add));
        assert_eq!(program.get(1), Some(&Instruction::Str { symbol: "x".into() }));
    }

    #[test]
    fn ignores_lines_past_capacity() {
        let src = "XCH\n".repeat(PROGRAM_SIZE) + "JMP oops\n";
        let program = parse(&src).unwrap();
        assert_eq!(program.iter().count(), PROGRAM_SIZE);
        assert_eq!(program.get(PROGRAM_SIZE as Addr), None);
    }

    #[test]
    fn rejects_bad_integers() {
        let error = parse("LDI 1\nLDI five").unwrap_err();
        assert!(matches!(
            error,
            LoadError::InvalidInteger {
                line: 2,
                opcode: Opcode::Ldi,
                ..
            }
        ));
        assert_eq!(error.span(), 10..14);

        assert!(parse("LDI 2147483648").is_err());
        assert!(parse("LDI -2147483648").is_ok());
        assert!(parse("LDI 12abc").is_err());
        assert!(parse("JVS 1.5").is_err());
        assert!(parse("JMP 2147483648").is_err());
    }

    #[test]
    fn accepts_any_i32_jump_target() {
        let program = parse("JMP -1
JZS 70000
JVS 65536").unwrap();
        assert_eq!(program.get(0), Some(&Instruction::Jmp { target: -1 }));
        assert_eq!(program.get(1), Some(&Instruction::Jzs { target: 70000 }));
        assert_eq!(program.get(2), Some(&Instruction::Jvs { target: 65536 }));
    }

    #[test]
    fn rejects_missing_operands() {
        let error = parse("HLT\n  JMP").unwrap_err();
        assert_eq!(
            error,
            LoadError::MissingOperand {
                line: 2,
                opcode: Opcode::Jmp,
                span: 6..9,
            }
        );
        assert!(parse("DEC").is_err());
        assert!(parse("XCH").is_ok());
    }
}
