use procs_data::{GenomeHash, Instruction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything known about one distinct instruction sequence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenomeRecord {
    pub hash: GenomeHash,
    pub instructions: Vec<Instruction>,
    /// Live processes born with this sequence.
    pub population: usize,
    pub peak_population: usize,
    pub total_spawned: usize,
    pub first_seen_tick: u64,
}

/// Registry of every genome that has ever lived in the core.
///
/// Records are never removed: a genome whose population drops to zero stays
/// in the registry with a count of zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GenomeRegistry {
    pub genomes: HashMap<GenomeHash, GenomeRecord>,
}

impl GenomeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one new live process running `instructions`.
    pub fn record_birth(&mut self, instructions: &[Instruction], tick: u64) -> GenomeHash {
        let hash = GenomeHash::of(instructions);
        let entry = self.genomes.entry(hash).or_insert_with(|| GenomeRecord {
            hash,
            instructions: instructions.to_vec(),
            population: 0,
            peak_population: 0,
            total_spawned: 0,
            first_seen_tick: tick,
        });
        entry.total_spawned += 1;
        entry.population += 1;
        if entry.population > entry.peak_population {
            entry.peak_population = entry.population;
        }
        hash
    }

    pub fn record_death(&mut self, hash: &GenomeHash) {
        if let Some(record) = self.genomes.get_mut(hash) {
            record.population = record.population.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn get(&self, hash: &GenomeHash) -> Option<&GenomeRecord> {
        self.genomes.get(hash)
    }

    #[must_use]
    pub fn population(&self, hash: &GenomeHash) -> usize {
        self.genomes.get(hash).map_or(0, |r| r.population)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Sum of all live populations.
    #[must_use]
    pub fn living(&self) -> usize {
        self.genomes.values().map(|r| r.population).sum()
    }

    /// Records ordered by current population, then by total spawned.
    /// Ties fall back to the hash so the order is stable.
    pub fn top_genomes(&self, count: usize) -> Vec<&GenomeRecord> {
        let mut list: Vec<_> = self.genomes.values().collect();
        list.sort_by(|a, b| {
            b.population
                .cmp(&a.population)
                .then(b.total_spawned.cmp(&a.total_spawned))
                .then(a.hash.cmp(&b.hash))
        });
        list.into_iter().take(count).collect()
    }

    pub fn extinct(&self) -> Vec<GenomeHash> {
        self.genomes
            .values()
            .filter(|r| r.population == 0)
            .map(|r| r.hash)
            .collect()
    }
}
