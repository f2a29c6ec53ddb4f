//! Round-robin scheduler over a shared core.
//!
//! A tick runs in four phases:
//!
//! 1. **Dispatch**: every live process, in list order, executes exactly one
//!    instruction. `SPW` is only recorded here; `CPN` acts immediately.
//! 2. **Kill**: processes marked dead release their genome count and cells.
//! 3. **Spawn**: surviving spawners copy themselves, with mutation, into
//!    vacant space (new process) or a NOP sled (latent parasite).
//! 4. **Perturbation**: with `swap_probability` percent, two nearby occupied
//!    cells exchange contents.
//!
//! Children are appended to the process list and first run on the next tick.

use crate::config::AppConfig;
use crate::error::Result;
use crate::events::{CpuEvent, DeathCause};
use crate::genome_registry::GenomeRegistry;
use crate::instruction::{self, Effect};
use crate::memory::{Core, Region};
use crate::mutation::mutate_copy;
use crate::process::Process;
use crate::snapshot::{CpuSnapshot, GenomeSnapshot};
use procs_data::{CellValue, GenomeHash, Instruction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

pub struct Cpu {
    config: AppConfig,
    core: Core,
    processes: Vec<Process>,
    registry: GenomeRegistry,
    rng: ChaCha8Rng,
    tick: u64,
}

impl Cpu {
    /// Builds a scheduler over an empty core of `core_size` cells with default
    /// settings otherwise. Fails if `mutation_probability` exceeds 100.
    pub fn new(core_size: usize, mutation_probability: u32) -> Result<Self> {
        let mut config = AppConfig::default();
        config.core.size = core_size;
        config.evolution.mutation_probability = mutation_probability;
        Self::with_config(config)
    }

    /// Builds a scheduler from a full configuration, seeding the random source
    /// from `core.seed` or from entropy.
    pub fn with_config(config: AppConfig) -> Result<Self> {
        let rng = match config.core.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Builds a scheduler that draws every random decision from `rng`.
    pub fn with_rng(config: AppConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let core = Core::new(config.core.size)?;
        tracing::debug!(
            size = config.core.size,
            mutation = config.evolution.mutation_probability,
            fingerprint = %config.fingerprint(),
            "CPU initialised"
        );
        Ok(Self {
            config,
            core,
            processes: Vec::new(),
            registry: GenomeRegistry::new(),
            rng,
            tick: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn core(&self) -> &Core {
        &self.core
    }

    #[must_use]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    #[must_use]
    pub fn registry(&self) -> &GenomeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Writes a (possibly mutated) copy of `ancestor` at `address` and starts
    /// a process on it.
    ///
    /// Only vacant space hosts a new process. Returns `Ok(None)` when the copy
    /// does not fit there, mutation deleted every instruction, or another
    /// process already starts at `address`.
    pub fn inoculate(&mut self, ancestor: &[Instruction], address: usize) -> Result<Option<usize>> {
        self.core.get_instruction(address)?;
        let mut process = Process::new(address, ancestor.len(), GenomeHash::of(ancestor))?;

        let instructions = mutate_copy(ancestor, &self.config.evolution, &mut self.rng);
        if instructions.is_empty()
            || self.is_start_taken(address)
            || self.core.region(address, instructions.len()) != Some(Region::Vacant)
            || !self.core.place(&instructions, address)?
        {
            return Ok(None);
        }

        process.resize(instructions.len())?;
        process.set_genome(self.registry.record_birth(&instructions, self.tick));
        tracing::debug!(address, length = instructions.len(), "Core inoculated");
        self.processes.push(process);
        Ok(Some(address))
    }

    /// Inoculates `ancestor` at a random address, retrying up to
    /// `spawn.attempts` times.
    pub fn inoculate_random(&mut self, ancestor: &[Instruction]) -> Result<Option<usize>> {
        for _ in 0..self.config.spawn.attempts {
            let address = self.rng.gen_range(0..self.core.size());
            if let Some(address) = self.inoculate(ancestor, address)? {
                return Ok(Some(address));
            }
        }
        Ok(None)
    }

    /// Kills the process starting at `address`, if any.
    pub fn remove_process(&mut self, address: usize) -> bool {
        let mut dead = HashMap::new();
        dead.insert(address, DeathCause::Removed);
        let mut events = Vec::new();
        self.kill(&dead, &mut events);
        !events.is_empty()
    }

    /// Advances the simulation by one round of dispatch.
    ///
    /// Organism failures never surface here; an error means the scheduler's own
    /// address arithmetic went wrong.
    pub fn tick(&mut self) -> Result<Vec<CpuEvent>> {
        self.tick += 1;
        let mut events = Vec::new();

        let (dead, mut spawners) = self.dispatch(&mut events)?;
        spawners.retain(|address| !dead.contains_key(address));
        self.kill(&dead, &mut events);
        self.spawn(&spawners, &mut events)?;
        self.perturb(&mut events)?;

        Ok(events)
    }

    fn dispatch(
        &mut self,
        events: &mut Vec<CpuEvent>,
    ) -> Result<(HashMap<usize, DeathCause>, Vec<usize>)> {
        let size = self.core.size();
        let lifetime = self.config.core.lifetime;
        let mut dead = HashMap::new();
        let mut spawners = Vec::new();

        for process in &mut self.processes {
            let address = process.current_address(size);
            let mut cause = None;

            match self.core.get_instruction(address)? {
                CellValue::Empty => cause = Some(DeathCause::InvalidAddress),
                CellValue::Instruction(op) => {
                    let effect = instruction::execute(
                        op,
                        process,
                        &mut self.core,
                        &self.config.combat,
                        &mut self.rng,
                    )?;
                    match effect {
                        Effect::Continue | Effect::Bomb(None) => {}
                        Effect::Spawn => spawners.push(process.start_address()),
                        Effect::Bomb(Some(target)) => {
                            tracing::trace!(source = address, target, "NOP bomb");
                            events.push(CpuEvent::NopBomb {
                                source: address,
                                target,
                                tick: self.tick,
                            });
                        }
                    }
                }
            }

            process.increment_ptr();
            if cause.is_none() && process.exec_count() > lifetime {
                cause = Some(DeathCause::LifetimeExceeded);
            }
            if let Some(cause) = cause {
                dead.insert(process.start_address(), cause);
            }
        }

        Ok((dead, spawners))
    }

    fn kill(&mut self, dead: &HashMap<usize, DeathCause>, events: &mut Vec<CpuEvent>) {
        if dead.is_empty() {
            return;
        }
        let core = &mut self.core;
        let registry = &mut self.registry;
        let tick = self.tick;

        self.processes.retain(|process| {
            let Some(&cause) = dead.get(&process.start_address()) else {
                return true;
            };
            registry.record_death(&process.genome());
            core.remove(process.start_address(), process.length());
            tracing::debug!(
                address = process.start_address(),
                ?cause,
                exec_count = process.exec_count(),
                "Process killed"
            );
            events.push(CpuEvent::Death {
                address: process.start_address(),
                cause,
                exec_count: process.exec_count(),
                tick,
            });
            false
        });
    }

    fn spawn(&mut self, spawners: &[usize], events: &mut Vec<CpuEvent>) -> Result<()> {
        for &parent in spawners {
            let Some(source) = self.processes.iter().find(|p| p.start_address() == parent) else {
                continue;
            };
            let Some(genome) = self.resident_genome(source.start_address(), source.length())
            else {
                tracing::trace!(parent, "Spawn dropped, source is damaged");
                continue;
            };

            let copy = mutate_copy(&genome, &self.config.evolution, &mut self.rng);
            if copy.is_empty() {
                continue;
            }
            let Some((address, region)) = self.find_site(copy.len()) else {
                continue;
            };
            if !self.core.place(&copy, address)? {
                continue;
            }

            match region {
                Region::Vacant => {
                    let hash = self.registry.record_birth(&copy, self.tick);
                    self.processes.push(Process::new(address, copy.len(), hash)?);
                    tracing::debug!(address, parent, length = copy.len(), "Process spawned");
                    events.push(CpuEvent::Birth {
                        address,
                        parent,
                        genome: hash,
                        length: copy.len(),
                        tick: self.tick,
                    });
                }
                Region::Sled => {
                    tracing::debug!(address, parent, length = copy.len(), "NOP sled parasitised");
                    events.push(CpuEvent::Parasitism {
                        address,
                        parent,
                        length: copy.len(),
                        tick: self.tick,
                    });
                }
            }
        }
        Ok(())
    }

    fn perturb(&mut self, events: &mut Vec<CpuEvent>) -> Result<()> {
        let perturbation = &self.config.perturbation;
        if self.rng.gen_range(0..100) >= perturbation.swap_probability {
            return Ok(());
        }
        let offset = self.rng.gen_range(0..perturbation.swap_range);
        let first = self.rng.gen_range(0..self.core.size());
        let second = self.core.wrap(first, offset);

        if first != second && self.core.swap_occupied(first, second)? {
            tracing::trace!(first, second, "Cells swapped");
            events.push(CpuEvent::Swap {
                first,
                second,
                tick: self.tick,
            });
        }
        Ok(())
    }

    /// Instructions currently resident in a process span, or `None` if any
    /// cell of it has been emptied.
    fn resident_genome(&self, start: usize, length: usize) -> Option<Vec<Instruction>> {
        let cells = self.core.read_range(start, length);
        if cells.len() != length {
            return None;
        }
        cells.into_iter().map(CellValue::instruction).collect()
    }

    /// Probes random addresses for a vacant region or NOP sled of `length`.
    fn find_site(&mut self, length: usize) -> Option<(usize, Region)> {
        for _ in 0..self.config.spawn.attempts {
            let address = self.rng.gen_range(0..self.core.size());
            match self.core.region(address, length) {
                Some(Region::Vacant) if !self.is_start_taken(address) => {
                    return Some((address, Region::Vacant));
                }
                Some(Region::Sled) => return Some((address, Region::Sled)),
                _ => {}
            }
        }
        None
    }

    fn is_start_taken(&self, address: usize) -> bool {
        self.processes.iter().any(|p| p.start_address() == address)
    }

    /// Metrics surface; only meaningful between ticks.
    #[must_use]
    pub fn snapshot(&self) -> CpuSnapshot {
        let genomes = self
            .registry
            .top_genomes(self.registry.len())
            .into_iter()
            .map(|record| GenomeSnapshot {
                hash: record.hash,
                population: record.population,
                instructions: record.instructions.clone(),
            })
            .collect();

        CpuSnapshot {
            tick: self.tick,
            processes: self.processes.len(),
            core_size: self.core.size(),
            occupied_cells: self.core.occupied(),
            genomes,
        }
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("tick", &self.tick)
            .field("core_size", &self.core.size())
            .field("processes", &self.processes.len())
            .field("genomes", &self.registry.len())
            .finish()
    }
}
