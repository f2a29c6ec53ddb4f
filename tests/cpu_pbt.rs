mod common;

use common::{registered_population, CpuBuilder};
use procs_lib::model::events::CpuEvent;
use procs_lib::model::Instruction;
use proptest::prelude::*;

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        3 => Just(Instruction::Nop),
        2 => Just(Instruction::Spw),
        1 => Just(Instruction::Cpn),
        1 => (-6i32..6).prop_map(Instruction::Jmp),
    ]
}

fn arb_program() -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec(arb_instruction(), 1..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_population_matches_registry(
        program in arb_program(),
        seed in any::<u64>(),
        mutation in 0u32..=100,
        swap in 0u32..=100,
    ) {
        let mut cpu = CpuBuilder::new(120)
            .with_seed(seed)
            .with_config(|c| {
                c.evolution.mutation_probability = mutation;
                c.perturbation.swap_probability = swap;
                c.core.lifetime = 40;
            })
            .with_program(program, 0)
            .build_unchecked();
        prop_assume!(cpu.process_count() == 1);

        for _ in 0..80 {
            let before = cpu.process_count();
            let events = cpu.tick().unwrap();

            let births = events.iter().filter(|e| matches!(e, CpuEvent::Birth { .. })).count();
            let deaths = events.iter().filter(|e| matches!(e, CpuEvent::Death { .. })).count();
            prop_assert_eq!(cpu.process_count(), before + births - deaths);
            prop_assert_eq!(registered_population(&cpu), cpu.process_count());
        }
    }

    #[test]
    fn test_processes_stay_inside_core(
        program in arb_program(),
        seed in any::<u64>(),
        address in 0usize..64,
    ) {
        let mut cpu = CpuBuilder::new(64)
            .with_seed(seed)
            .with_config(|c| c.evolution.mutation_probability = 50)
            .with_program(program, address)
            .build_unchecked();
        prop_assume!(cpu.process_count() == 1);

        for _ in 0..50 {
            cpu.tick().unwrap();
            let size = cpu.core().size();
            let mut starts = std::collections::HashSet::new();
            for process in cpu.processes() {
                prop_assert!(process.start_address() < size);
                prop_assert!(process.length() >= 1 && process.length() <= size);
                prop_assert!(process.ptr() < process.length());
                prop_assert!(process.exec_count() <= cpu.config().core.lifetime);
                prop_assert!(starts.insert(process.start_address()));
            }
        }
    }
}
