use std::error::Error;
use std::fmt;
use std::num::ParseIntError;
use std::ops::Range;

use miette::{miette, LabeledSpan, Report, Severity};

use crate::instruction::{Opcode, OperandKind};

/// Error loading program text. Loading stops at the first one.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LoadError {
    /// Operand could not be read as the integer this opcode requires.
    InvalidInteger {
        line: usize,
        opcode: Opcode,
        operand: String,
        span: Range<usize>,
        reason: String,
    },
    /// Opcode requires an operand, but the line ends after the mnemonic.
    MissingOperand {
        line: usize,
        opcode: Opcode,
        span: Range<usize>,
    },
}

impl LoadError {
    pub(crate) fn invalid_integer(
        line: usize,
        opcode: Opcode,
        operand: &str,
        span: Range<usize>,
        error: ParseIntError,
    ) -> Self {
        Self::InvalidInteger {
            line,
            opcode,
            operand: operand.to_string(),
            span,
            reason: error.to_string(),
        }
    }

    /// 1-based line number in the program text.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidInteger { line, .. } | Self::MissingOperand { line, .. } => *line,
        }
    }

    /// Byte range of the offending text.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::InvalidInteger { span, .. } | Self::MissingOperand { span, .. } => span.clone(),
        }
    }

    /// Render against the program text for display on the command line.
    pub fn report(&self, src: &str) -> Report {
        let span = self.span();
        let report = match self {
            Self::InvalidInteger { opcode, .. } => miette!(
                severity = Severity::Error,
                code = "load::bad_int",
                help = help_for(*opcode),
                labels = vec![LabeledSpan::at(span, "invalid integer")],
                "{}",
                self,
            ),
            Self::MissingOperand { opcode, .. } => miette!(
                severity = Severity::Error,
                code = "load::missing_operand",
                help = help_for(*opcode),
                labels = vec![LabeledSpan::at(span, "expected operand after this")],
                "{}",
                self,
            ),
        };
        report.with_source_code(src.to_string())
    }
}

fn help_for(opcode: Opcode) -> String {
    match opcode.operand_kind() {
        OperandKind::Literal => format!(
            "`{opcode}` takes a decimal integer from {} to {}",
            i32::MIN,
            i32::MAX
        ),
        OperandKind::Address => {
            format!("`{opcode}` takes an instruction address, like `{opcode} 0`")
        }
        OperandKind::Symbol => format!("`{opcode}` takes a variable name, like `{opcode} x`"),
        OperandKind::None => format!("`{opcode}` takes no operands"),
    }
}

impl Error for LoadError {}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteger {
                line,
                opcode,
                operand,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Line {}: invalid integer `{}` for `{}`: {}.",
                    line, operand, opcode, reason
                )
            }
            Self::MissingOperand { line, opcode, .. } => {
                write!(f, "Line {}: missing operand for `{}`.", line, opcode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let error = LoadError::MissingOperand {
            line: 3,
            opcode: Opcode::Jmp,
            span: 10..13,
        };
        assert_eq!(error.to_string(), "Line 3: missing operand for `JMP`.");
        assert_eq!(error.line(), 3);

        let parse_error = "x1".parse::<i32>().unwrap_err();
        let error = LoadError::invalid_integer(1, Opcode::Ldi, "x1", 4..6, parse_error);
        assert_eq!(
            error.to_string(),
            "Line 1: invalid integer `x1` for `LDI`: invalid digit found in string."
        );
        assert_eq!(error.span(), 4..6);
    }
}
