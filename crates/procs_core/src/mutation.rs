//! Copy mutation applied whenever a sequence is written into the core.
//!
//! Each instruction of the source mutates independently with
//! `mutation_probability` percent. A mutation is one of three classes chosen
//! uniformly: substitution, deletion or duplication. The source is never
//! modified; only the returned copy differs.

use crate::config::EvolutionConfig;
use procs_data::{Instruction, Opcode};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Replace the opcode with one of the other three.
    Substitute,
    /// Drop the instruction from the copy.
    Delete,
    /// Write the instruction twice.
    Insert,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [
        MutationKind::Substitute,
        MutationKind::Delete,
        MutationKind::Insert,
    ];
}

/// Produces a possibly mutated copy of `source`. May return an empty vector
/// when every instruction was deleted.
///
/// Operands of newly substituted `Jmp`s are drawn once the copy is complete,
/// so they always target a position inside the copy itself.
pub fn mutate_copy<R: Rng>(
    source: &[Instruction],
    config: &EvolutionConfig,
    rng: &mut R,
) -> Vec<Instruction> {
    if config.mutation_probability == 0 {
        return source.to_vec();
    }

    let mut copy = Vec::with_capacity(source.len() + 1);
    let mut fresh_jumps = Vec::new();
    for (position, &instruction) in source.iter().enumerate() {
        if rng.gen_range(0..100) >= config.mutation_probability {
            copy.push(instruction);
            continue;
        }

        let kind = MutationKind::ALL[rng.gen_range(0..MutationKind::ALL.len())];
        tracing::trace!(?kind, position, %instruction, "Copy mutation");
        match kind {
            MutationKind::Substitute => {
                let opcode = substitute(instruction, rng);
                if opcode == Opcode::Jmp {
                    fresh_jumps.push(copy.len());
                }
                copy.push(Instruction::from_opcode(opcode, 0));
            }
            MutationKind::Delete => {}
            MutationKind::Insert => {
                copy.push(instruction);
                copy.push(instruction);
            }
        }
    }

    let length = copy.len();
    for index in fresh_jumps {
        copy[index] = Instruction::Jmp(jump_offset(index, length, rng));
    }
    copy
}

/// Picks an opcode other than the one `instruction` has.
pub fn substitute<R: Rng>(instruction: Instruction, rng: &mut R) -> Opcode {
    let current = instruction.opcode();
    let others: Vec<Opcode> = Opcode::ALL
        .into_iter()
        .filter(|&opcode| opcode != current)
        .collect();
    others.choose(rng).copied().unwrap_or(Opcode::Nop)
}

/// Picks a direction uniformly, then a distance uniformly among the
/// instructions available that way. Falls back to the other direction when
/// one side has no room; a single-instruction span yields zero.
pub fn jump_offset<R: Rng>(position: usize, length: usize, rng: &mut R) -> i32 {
    let ahead = length.saturating_sub(position + 1);
    let behind = position.min(length.saturating_sub(1));

    let forward = rng.gen_bool(0.5);
    let (room, sign) = if (forward && ahead > 0) || behind == 0 {
        (ahead, 1)
    } else {
        (behind, -1)
    };
    if room == 0 {
        return 0;
    }
    let distance = rng.gen_range(1..=room);
    sign * i32::try_from(distance).unwrap_or(i32::MAX)
}
