use procs_lib::model::config::AppConfig;
use procs_lib::model::cpu::Cpu;
use procs_lib::model::Instruction;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[allow(dead_code)]
pub struct CpuBuilder {
    config: AppConfig,
    programs: Vec<(Vec<Instruction>, usize)>,
    seed: u64,
}

#[allow(dead_code)]
impl CpuBuilder {
    /// Small core, no mutation, no perturbation.
    pub fn new(size: usize) -> Self {
        let mut config = AppConfig::default();
        config.core.size = size;
        config.evolution.mutation_probability = 0;
        config.perturbation.swap_probability = 0;
        Self {
            config,
            programs: Vec::new(),
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_program(mut self, program: Vec<Instruction>, address: usize) -> Self {
        self.programs.push((program, address));
        self
    }

    pub fn build(self) -> Cpu {
        let expected = self.programs.len();
        let cpu = self.build_unchecked();
        assert_eq!(cpu.process_count(), expected, "a program did not fit");
        cpu
    }

    /// Like `build`, but tolerates programs that mutation erased or that
    /// did not fit.
    pub fn build_unchecked(self) -> Cpu {
        let rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut cpu = Cpu::with_rng(self.config, rng).expect("valid config");
        for (program, address) in self.programs {
            cpu.inoculate(&program, address).expect("address in core");
        }
        cpu
    }
}

#[allow(dead_code)]
pub fn ancestor() -> Vec<Instruction> {
    procs_lib::model::config::default_ancestor()
}

/// Sum of per-genome populations as reported by the registry.
#[allow(dead_code)]
pub fn registered_population(cpu: &Cpu) -> usize {
    cpu.snapshot().genomes.iter().map(|g| g.population).sum()
}
