//! Execution context of one living organism.
//!
//! A process owns no instructions; it is a window of `length` cells in the
//! core starting at `start_address`, plus a relative instruction pointer.

use crate::error::{CoreError, Result};
use procs_data::GenomeHash;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Process {
    start_address: usize,
    length: usize,
    ptr: usize,
    exec_count: u64,
    genome: GenomeHash,
}

impl Process {
    /// Creates a process with its pointer on its first instruction.
    ///
    /// `genome` is the hash of the sequence the process was born with; its
    /// population is released against that hash when the process dies.
    pub fn new(start_address: usize, length: usize, genome: GenomeHash) -> Result<Self> {
        if length == 0 {
            return Err(CoreError::EmptyProcess);
        }
        Ok(Self {
            start_address,
            length,
            ptr: 0,
            exec_count: 0,
            genome,
        })
    }

    #[must_use]
    pub fn start_address(&self) -> usize {
        self.start_address
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn ptr(&self) -> usize {
        self.ptr
    }

    #[must_use]
    pub fn exec_count(&self) -> u64 {
        self.exec_count
    }

    #[must_use]
    pub fn genome(&self) -> GenomeHash {
        self.genome
    }

    /// Advances the pointer by one, wrapping at `length`, and counts one
    /// executed instruction. This is the only place `exec_count` grows.
    pub fn increment_ptr(&mut self) {
        self.ptr = (self.ptr + 1) % self.length;
        self.exec_count += 1;
    }

    /// Moves the pointer by `delta`, wrapping in both directions.
    ///
    /// Equivalent to `|delta|` single steps that each wrap modulo `length`.
    pub fn shift_ptr(&mut self, delta: i64) {
        let length = self.length as i64;
        self.ptr = (self.ptr as i64 + delta).rem_euclid(length) as usize;
    }

    /// Absolute core address this process reads next.
    #[must_use]
    pub fn current_address(&self, core_size: usize) -> usize {
        (self.start_address + self.ptr) % core_size
    }

    /// Changes the instruction count after a mutated placement, clamping the
    /// pointer back inside the new span.
    pub fn resize(&mut self, length: usize) -> Result<()> {
        if length == 0 {
            return Err(CoreError::EmptyProcess);
        }
        self.length = length;
        self.ptr = self.ptr.min(length - 1);
        Ok(())
    }

    pub(crate) fn set_genome(&mut self, genome: GenomeHash) {
        self.genome = genome;
    }
}
