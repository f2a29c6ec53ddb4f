//! Execution semantics of the four opcodes.
//!
//! `execute` never advances the instruction pointer or the execution counter;
//! the scheduler does that once per dispatched instruction.

use crate::config::CombatConfig;
use crate::error::Result;
use crate::memory::Core;
use crate::process::Process;
use procs_data::{CellValue, Instruction};
use rand::Rng;

/// What the scheduler has to do after an instruction ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing beyond the usual pointer increment.
    Continue,
    /// The process asked to replicate; resolved after the dispatch pass.
    Spawn,
    /// A NOP bomb was thrown; carries the cell it hit, if any.
    Bomb(Option<usize>),
}

pub fn execute<R: Rng>(
    instruction: Instruction,
    process: &mut Process,
    core: &mut Core,
    combat: &CombatConfig,
    rng: &mut R,
) -> Result<Effect> {
    match instruction {
        Instruction::Nop => Ok(Effect::Continue),
        Instruction::Jmp(offset) => {
            jump(process, offset);
            Ok(Effect::Continue)
        }
        Instruction::Spw => Ok(Effect::Spawn),
        Instruction::Cpn => nop_bomb(core, process, combat, rng).map(Effect::Bomb),
    }
}

/// Moves the relative pointer so that, after the scheduler's increment, the
/// next instruction is `offset` away for a forward jump and `offset + 1` away
/// for a backward one. `JMP 1` and `JMP 0` fall through like `NOP`; `JMP -1`
/// runs itself again. Wraps inside the process as many times as needed.
pub fn jump(process: &mut Process, offset: i32) {
    let delta = if offset > 0 { offset - 1 } else { offset };
    process.shift_ptr(i64::from(delta));
}

/// Drops a `Nop` on an occupied cell within `bomb_range` cells before the
/// start or after the end of `process`.
///
/// Each attempt picks a fresh side and distance. Landing on an empty cell, or
/// wrapping back onto the bomber's own span in a small core, wastes the
/// attempt. Returns the address that was hit.
pub fn nop_bomb<R: Rng>(
    core: &mut Core,
    process: &Process,
    combat: &CombatConfig,
    rng: &mut R,
) -> Result<Option<usize>> {
    let size = core.size();
    let start = process.start_address();
    let last = core.wrap(start, process.length() - 1);

    for _ in 0..combat.bomb_attempts {
        let distance = rng.gen_range(1..=combat.bomb_range) % size;
        let forward = rng.gen_range(0..100) < combat.forward_bias;
        let target = if forward {
            core.wrap(last, distance)
        } else {
            core.wrap(start, size - distance)
        };

        let own = (target + size - start) % size < process.length();
        if !own && !core.get_instruction(target)?.is_empty() {
            core.set_instruction(target, CellValue::Instruction(Instruction::Nop))?;
            return Ok(Some(target));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use procs_data::GenomeHash;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ancestor() -> Vec<Instruction> {
        vec![
            Instruction::Nop,
            Instruction::Nop,
            Instruction::Spw,
            Instruction::Nop,
            Instruction::Nop,
        ]
    }

    fn setup(size: usize, address: usize) -> (Core, Process) {
        let mut core = Core::new(size).unwrap();
        core.place(&ancestor(), address).unwrap();
        let process = Process::new(address, 5, GenomeHash::of(&ancestor())).unwrap();
        (core, process)
    }

    #[test]
    fn test_jump_moves_pointer() {
        let (_, mut process) = setup(10, 0);

        jump(&mut process, 4);
        assert_eq!(process.ptr(), 3);
        jump(&mut process, 4);
        assert_eq!(process.ptr(), 1);
        jump(&mut process, -1);
        assert_eq!(process.ptr(), 0);
        jump(&mut process, -4);
        assert_eq!(process.ptr(), 1);
        jump(&mut process, 0);
        assert_eq!(process.ptr(), 1);
        jump(&mut process, 1);
        assert_eq!(process.ptr(), 1);
    }

    #[test]
    fn test_execute_effects() {
        let (mut core, mut process) = setup(10, 0);
        let combat = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let effect = execute(Instruction::Nop, &mut process, &mut core, &combat, &mut rng);
        assert_eq!(effect, Ok(Effect::Continue));
        let effect = execute(Instruction::Spw, &mut process, &mut core, &combat, &mut rng);
        assert_eq!(effect, Ok(Effect::Spawn));
        let effect = execute(Instruction::Jmp(2), &mut process, &mut core, &combat, &mut rng);
        assert_eq!(effect, Ok(Effect::Continue));
        assert_eq!(process.ptr(), 1);
        assert_eq!(process.exec_count(), 0);
    }

    #[test]
    fn test_nop_bomb_hits_neighbour() {
        let (mut core, process) = setup(10, 0);
        for address in 5..10 {
            core.set_instruction(address, Instruction::Cpn.into()).unwrap();
        }
        let combat = CombatConfig {
            bomb_range: 4,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let hit = nop_bomb(&mut core, &process, &combat, &mut rng)
            .unwrap()
            .expect("every neighbouring cell is occupied");
        assert!((5..10).contains(&hit));
        assert_eq!(core.get_instruction(hit).unwrap(), Instruction::Nop.into());
    }

    #[test]
    fn test_nop_bomb_respects_bias() {
        let (mut core, process) = setup(100, 50);
        core.set_instruction(40, Instruction::Spw.into()).unwrap();
        core.set_instruction(60, Instruction::Spw.into()).unwrap();
        let combat = CombatConfig {
            bomb_range: 10,
            bomb_attempts: 1000,
            forward_bias: 100,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let hit = nop_bomb(&mut core, &process, &combat, &mut rng).unwrap();
        assert_eq!(hit, Some(60));
        assert_eq!(core.get_instruction(40).unwrap(), Instruction::Spw.into());
    }

    #[test]
    fn test_nop_bomb_never_hits_own_span() {
        let (mut core, process) = setup(6, 0);
        core.set_instruction(5, Instruction::Cpn.into()).unwrap();
        let combat = CombatConfig {
            bomb_range: 100,
            bomb_attempts: 10,
            forward_bias: 50,
        };

        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let hit = nop_bomb(&mut core, &process, &combat, &mut rng).unwrap();
            assert!(matches!(hit, None | Some(5)), "hit {:?}", hit);
            assert_eq!(core.get_instruction(2).unwrap(), Instruction::Spw.into());
            core.set_instruction(5, Instruction::Cpn.into()).unwrap();
        }
    }

    #[test]
    fn test_nop_bomb_in_empty_neighbourhood_is_wasted() {
        let (mut core, process) = setup(1000, 500);
        let before = core.clone();
        let combat = CombatConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        assert_eq!(nop_bomb(&mut core, &process, &combat, &mut rng), Ok(None));
        assert_eq!(core, before);
    }
}
