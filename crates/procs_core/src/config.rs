//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto a `config.toml` file. Every field has
//! a default, so a file only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! ancestor = ["NOP", "NOP", "SPW", "NOP", "NOP"]
//!
//! [core]
//! size = 100000
//! lifetime = 1000
//! seed = 42
//!
//! [evolution]
//! mutation_probability = 1
//!
//! [perturbation]
//! swap_probability = 5
//! ```

use crate::error::{ensure_config, Result};
use procs_data::Instruction;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Memory and scheduling parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Number of cells in the circular core.
    pub size: usize,
    /// Instructions a process may execute before it is killed.
    pub lifetime: u64,
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            size: 100_000,
            lifetime: 1000,
            seed: None,
        }
    }
}

/// Copy mutation parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Percent chance that each copied instruction mutates.
    pub mutation_probability: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_probability: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Random sites probed per `SPW` before the copy is dropped.
    pub attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self { attempts: 10 }
    }
}

/// NOP bomb parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CombatConfig {
    /// Maximum distance from the process boundary a bomb can land.
    pub bomb_range: usize,
    /// Targets tried per `CPN` before giving up.
    pub bomb_attempts: u32,
    /// Percent chance a bomb lands after the process rather than before it.
    pub forward_bias: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            bomb_range: 100,
            bomb_attempts: 10,
            forward_bias: 50,
        }
    }
}

/// Background noise applied once per tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PerturbationConfig {
    /// Percent chance per tick that two nearby occupied cells swap.
    pub swap_probability: u32,
    /// Maximum distance between the swapped cells.
    pub swap_range: usize,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            swap_probability: 0,
            swap_range: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub evolution: EvolutionConfig,
    pub spawn: SpawnConfig,
    pub combat: CombatConfig,
    pub perturbation: PerturbationConfig,
    /// Program the core is inoculated with.
    pub ancestor: Vec<Instruction>,
    /// Ticks between metric reports.
    pub report_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            evolution: EvolutionConfig::default(),
            spawn: SpawnConfig::default(),
            combat: CombatConfig::default(),
            perturbation: PerturbationConfig::default(),
            ancestor: default_ancestor(),
            report_interval: 10_000,
        }
    }
}

/// The classic five-instruction replicator.
#[must_use]
pub fn default_ancestor() -> Vec<Instruction> {
    vec![
        Instruction::Nop,
        Instruction::Nop,
        Instruction::Spw,
        Instruction::Nop,
        Instruction::Nop,
    ]
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Err(CoreError::InvalidConfig)` describing the first failure.
    /// Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        ensure_config(self.core.size > 0, "Core size must be positive")?;
        ensure_config(self.core.lifetime > 0, "Lifetime must be positive")?;

        ensure_config(
            self.evolution.mutation_probability <= 100,
            "Mutation probability must be in [0, 100]",
        )?;

        ensure_config(self.spawn.attempts > 0, "Spawn attempts must be positive")?;

        ensure_config(self.combat.bomb_range > 0, "Bomb range must be positive")?;
        ensure_config(
            self.combat.bomb_attempts > 0,
            "Bomb attempts must be positive",
        )?;
        ensure_config(
            self.combat.forward_bias <= 100,
            "Bomb forward bias must be in [0, 100]",
        )?;

        ensure_config(
            self.perturbation.swap_probability <= 100,
            "Swap probability must be in [0, 100]",
        )?;
        ensure_config(
            self.perturbation.swap_range > 0,
            "Swap range must be positive",
        )?;

        ensure_config(!self.ancestor.is_empty(), "Ancestor must not be empty")?;

        ensure_config(
            self.report_interval > 0,
            "Report interval must be positive",
        )?;
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)
            .map_err(|e| crate::error::CoreError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CoreError::config(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Hash of every parameter that influences the simulation.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.core).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.spawn).as_bytes());
        hasher.update(format!("{:?}", self.combat).as_bytes());
        hasher.update(format!("{:?}", self.perturbation).as_bytes());
        hasher.update(format!("{:?}", self.ancestor).as_bytes());
        hex::encode(hasher.finalize())
    }
}
