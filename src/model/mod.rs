pub use procs_core::{CellValue, GenomeHash, Instruction, Opcode};
pub mod config {
    pub use procs_core::config::*;
}
pub mod cpu {
    pub use procs_core::cpu::*;
}
pub mod events {
    pub use procs_core::events::*;
}
pub mod genome_registry {
    pub use procs_core::genome_registry::*;
}
pub mod memory {
    pub use procs_core::memory::*;
}
pub mod metrics {
    pub use procs_core::metrics::*;
}
pub mod process {
    pub use procs_core::process::*;
}
pub mod snapshot {
    pub use procs_core::snapshot::*;
}
