//! # Procs Core
//!
//! The simulation engine for procs: self-replicating programs competing for
//! space in a shared circular memory.
//!
//! This crate contains:
//! - The circular core and its all-or-nothing placement rules
//! - Execution semantics of the `NOP`/`JMP`/`SPW`/`CPN` instruction set
//! - Copy mutation (substitution, deletion, duplication)
//! - Genome population bookkeeping
//! - The round-robin scheduler that ties them together
//!
//! ## Example
//!
//! ```
//! use procs_core::config::default_ancestor;
//! use procs_core::Cpu;
//!
//! let mut cpu = Cpu::new(1000, 0).unwrap();
//! cpu.inoculate(&default_ancestor(), 0).unwrap();
//! for _ in 0..100 {
//!     cpu.tick().unwrap();
//! }
//! assert!(cpu.process_count() >= 1);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Round-robin scheduler
pub mod cpu;
/// Error types and result alias
pub mod error;
/// Events emitted by each tick
pub mod events;
/// Genome population registry
pub mod genome_registry;
/// Opcode execution semantics
pub mod instruction;
/// Circular core memory
pub mod memory;
/// Run metrics and structured logging
pub mod metrics;
/// Copy mutation
pub mod mutation;
/// Per-organism execution context
pub mod process;
/// Serialisable metrics surface
pub mod snapshot;

pub use config::AppConfig;
pub use cpu::Cpu;
pub use error::{CoreError, Result};
pub use events::{CpuEvent, DeathCause};
pub use genome_registry::{GenomeRecord, GenomeRegistry};
pub use memory::{Core, Region};
pub use metrics::{init_logging, Metrics};
pub use process::Process;
pub use procs_data::{CellValue, GenomeHash, Instruction, Opcode};
pub use snapshot::{CpuSnapshot, GenomeSnapshot};
