use procs_data::GenomeHash;
use serde::{Deserialize, Serialize};

/// Why a process was removed from the core.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The pointer walked onto an empty cell.
    InvalidAddress,
    /// `exec_count` went past the configured lifetime.
    LifetimeExceeded,
    /// Removed on request by the driver.
    Removed,
}

/// Something observable that happened during a tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CpuEvent {
    Death {
        address: usize,
        cause: DeathCause,
        exec_count: u64,
        tick: u64,
    },
    Birth {
        address: usize,
        parent: usize,
        genome: GenomeHash,
        length: usize,
        tick: u64,
    },
    /// A copy landed in a NOP sled and got no thread of its own.
    Parasitism {
        address: usize,
        parent: usize,
        length: usize,
        tick: u64,
    },
    NopBomb {
        source: usize,
        target: usize,
        tick: u64,
    },
    Swap {
        first: usize,
        second: usize,
        tick: u64,
    },
}
