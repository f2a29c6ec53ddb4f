use procs_data::{GenomeHash, Instruction};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenomeSnapshot {
    pub hash: GenomeHash,
    pub population: usize,
    pub instructions: Vec<Instruction>,
}

/// Read-only view of the scheduler taken between ticks.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub tick: u64,
    pub processes: usize,
    pub core_size: usize,
    pub occupied_cells: usize,
    /// Every genome ever seen, most populous first.
    pub genomes: Vec<GenomeSnapshot>,
}

impl CpuSnapshot {
    /// Genomes with at least one living process.
    pub fn living_genomes(&self) -> impl Iterator<Item = &GenomeSnapshot> {
        self.genomes.iter().filter(|g| g.population > 0)
    }
}
