use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operand-free instruction tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Nop,
    Jmp,
    Spw,
    Cpn,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [Opcode::Nop, Opcode::Jmp, Opcode::Spw, Opcode::Cpn];

    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Jmp => "JMP",
            Opcode::Spw => "SPW",
            Opcode::Cpn => "CPN",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A single decoded instruction.
///
/// Only `Jmp` carries an operand: the signed number of instructions to move the
/// relative instruction pointer by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Instruction {
    /// No operation.
    Nop,
    /// Relative jump within the owning process.
    Jmp(i32),
    /// Request replication of the owning process.
    Spw,
    /// Overwrite a nearby occupied cell with a `Nop` ("NOP bomb").
    Cpn,
}

impl Instruction {
    #[must_use]
    pub fn opcode(self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::Jmp(_) => Opcode::Jmp,
            Instruction::Spw => Opcode::Spw,
            Instruction::Cpn => Opcode::Cpn,
        }
    }

    /// Builds an instruction from its tag. `operand` is only used for `Jmp`.
    #[must_use]
    pub fn from_opcode(opcode: Opcode, operand: i32) -> Self {
        match opcode {
            Opcode::Nop => Instruction::Nop,
            Opcode::Jmp => Instruction::Jmp(operand),
            Opcode::Spw => Instruction::Spw,
            Opcode::Cpn => Instruction::Cpn,
        }
    }

    #[must_use]
    pub fn is_nop(self) -> bool {
        matches!(self, Instruction::Nop)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Jmp(offset) => write!(f, "JMP {offset}"),
            other => f.write_str(other.opcode().mnemonic()),
        }
    }
}

/// Failure to decode instruction text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseInstructionError {
    #[error("empty instruction")]
    Empty,

    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("JMP requires an operand")]
    MissingOperand,

    #[error("invalid JMP operand: {0}")]
    InvalidOperand(String),

    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),
}

impl FromStr for Instruction {
    type Err = ParseInstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mnemonic = tokens.next().ok_or(ParseInstructionError::Empty)?;

        let instruction = match mnemonic.to_ascii_uppercase().as_str() {
            "NOP" => Instruction::Nop,
            "SPW" => Instruction::Spw,
            "CPN" => Instruction::Cpn,
            "JMP" => {
                let operand = tokens.next().ok_or(ParseInstructionError::MissingOperand)?;
                let offset = operand
                    .parse::<i32>()
                    .map_err(|_| ParseInstructionError::InvalidOperand(operand.to_string()))?;
                Instruction::Jmp(offset)
            }
            _ => return Err(ParseInstructionError::UnknownOpcode(mnemonic.to_string())),
        };

        if let Some(extra) = tokens.next() {
            return Err(ParseInstructionError::TrailingInput(extra.to_string()));
        }
        Ok(instruction)
    }
}

impl TryFrom<String> for Instruction {
    type Error = ParseInstructionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Instruction> for String {
    fn from(value: Instruction) -> Self {
        value.to_string()
    }
}

/// Contents of one core cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Instruction(Instruction),
}

impl CellValue {
    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty cells and `Nop`s may be overwritten by a placement.
    #[must_use]
    pub fn is_writable(self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Instruction(instruction) => instruction.is_nop(),
        }
    }

    #[must_use]
    pub fn instruction(self) -> Option<Instruction> {
        match self {
            CellValue::Empty => None,
            CellValue::Instruction(instruction) => Some(instruction),
        }
    }
}

impl From<Instruction> for CellValue {
    fn from(value: Instruction) -> Self {
        CellValue::Instruction(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => f.write_str("-"),
            CellValue::Instruction(instruction) => instruction.fmt(f),
        }
    }
}
