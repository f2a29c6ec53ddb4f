//! Plain data shared by the procs engine and its driver.
//!
//! Everything here is serialisable and free of simulation logic: the closed
//! instruction set, the contents of a core cell and the content hash that
//! identifies a genome.

pub mod data;

pub use data::genome::GenomeHash;
pub use data::instruction::{CellValue, Instruction, Opcode, ParseInstructionError};
