//! The circular memory shared by every process.
//!
//! Raw addresses are strict: `get_instruction`, `set_instruction` and
//! `place` reject anything outside `[0, size)`. Only ranges that start at a
//! valid address wrap around the end of the core.

use crate::error::{CoreError, Result};
use procs_data::{CellValue, Instruction};
use serde::{Deserialize, Serialize};

/// What a candidate region of the core can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Every cell is empty: a new process can live here.
    Vacant,
    /// Every cell is a `Nop`: code can be written here but gets no thread.
    Sled,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Core {
    cells: Vec<CellValue>,
}

impl Core {
    /// Creates an empty core with `size` cells.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CoreError::config("Core size must be positive"));
        }
        Ok(Self {
            cells: vec![CellValue::Empty; size],
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Address `offset` cells after `start`, wrapped into the core.
    #[must_use]
    pub fn wrap(&self, start: usize, offset: usize) -> usize {
        (start % self.size() + offset % self.size()) % self.size()
    }

    fn check(&self, address: usize) -> Result<()> {
        if address < self.size() {
            Ok(())
        } else {
            Err(CoreError::OutOfRange {
                address,
                size: self.size(),
            })
        }
    }

    pub fn get_instruction(&self, address: usize) -> Result<CellValue> {
        self.check(address)?;
        Ok(self.cells[address])
    }

    /// Overwrites a single cell without any space check.
    pub fn set_instruction(&mut self, address: usize, value: CellValue) -> Result<()> {
        self.check(address)?;
        self.cells[address] = value;
        Ok(())
    }

    /// Writes `instructions` starting at `start`, wrapping around the end.
    ///
    /// All or nothing: returns `Ok(false)` and leaves the core untouched unless
    /// every target cell is empty or a `Nop`. A sequence longer than the core
    /// would overlap itself and is never placed.
    pub fn place(&mut self, instructions: &[Instruction], start: usize) -> Result<bool> {
        self.check(start)?;
        if instructions.len() > self.size() {
            return Ok(false);
        }

        let writable = (0..instructions.len())
            .all(|offset| self.cells[self.wrap(start, offset)].is_writable());
        if !writable {
            return Ok(false);
        }

        for (offset, instruction) in instructions.iter().enumerate() {
            let location = self.wrap(start, offset);
            self.cells[location] = CellValue::Instruction(*instruction);
        }
        Ok(true)
    }

    /// Empties `length` cells from `start`. Stale or invalid ranges are ignored.
    pub fn remove(&mut self, start: usize, length: usize) {
        if start >= self.size() || length > self.size() {
            return;
        }
        for offset in 0..length {
            let location = self.wrap(start, offset);
            self.cells[location] = CellValue::Empty;
        }
    }

    /// Circular read of `length` cells. Empty when the range is invalid.
    #[must_use]
    pub fn read_range(&self, start: usize, length: usize) -> Vec<CellValue> {
        if start >= self.size() || length > self.size() {
            return Vec::new();
        }
        (0..length)
            .map(|offset| self.cells[self.wrap(start, offset)])
            .collect()
    }

    /// Classifies the `length` cells from `start` as a spawn target.
    #[must_use]
    pub fn region(&self, start: usize, length: usize) -> Option<Region> {
        let cells = self.read_range(start, length);
        if cells.is_empty() {
            return None;
        }
        if cells.iter().all(|cell| cell.is_empty()) {
            Some(Region::Vacant)
        } else if cells
            .iter()
            .all(|cell| cell.instruction().is_some_and(Instruction::is_nop))
        {
            Some(Region::Sled)
        } else {
            None
        }
    }

    /// Exchanges two cells if both are occupied. Returns whether a swap happened.
    pub fn swap_occupied(&mut self, first: usize, second: usize) -> Result<bool> {
        self.check(first)?;
        self.check(second)?;
        if self.cells[first].is_empty() || self.cells[second].is_empty() {
            return Ok(false);
        }
        self.cells.swap(first, second);
        Ok(true)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ancestor() -> Vec<Instruction> {
        vec![
            Instruction::Nop,
            Instruction::Nop,
            Instruction::Spw,
            Instruction::Nop,
            Instruction::Nop,
        ]
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Core::new(0), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_raw_access_is_strict() {
        let mut core = Core::new(10).unwrap();
        assert_eq!(core.size(), 10);
        assert!(core.get_instruction(9).is_ok());
        assert_eq!(
            core.get_instruction(10),
            Err(CoreError::OutOfRange {
                address: 10,
                size: 10
            })
        );
        assert!(core.set_instruction(10, Instruction::Nop.into()).is_err());
        assert!(core.place(&ancestor(), 10).is_err());
    }

    #[test]
    fn test_place_wraps_around() {
        let mut core = Core::new(10).unwrap();
        assert!(core.place(&ancestor(), 8).unwrap());

        assert_eq!(core.get_instruction(8).unwrap(), Instruction::Nop.into());
        assert_eq!(core.get_instruction(9).unwrap(), Instruction::Nop.into());
        assert_eq!(core.get_instruction(0).unwrap(), Instruction::Spw.into());
        assert_eq!(core.get_instruction(1).unwrap(), Instruction::Nop.into());
        assert_eq!(core.get_instruction(2).unwrap(), Instruction::Nop.into());
        for address in 3..8 {
            assert_eq!(core.get_instruction(address).unwrap(), CellValue::Empty);
        }
    }

    #[test]
    fn test_place_is_all_or_nothing() {
        let mut core = Core::new(10).unwrap();
        core.set_instruction(4, Instruction::Cpn.into()).unwrap();
        let before = core.clone();

        assert!(!core.place(&ancestor(), 2).unwrap());
        assert_eq!(core, before);
    }

    #[test]
    fn test_place_over_nop_sled() {
        let mut core = Core::new(10).unwrap();
        let sled = vec![Instruction::Nop; 6];
        assert!(core.place(&sled, 0).unwrap());

        let parasite = [Instruction::Spw, Instruction::Jmp(-1)];
        assert!(core.place(&parasite, 2).unwrap());
        assert_eq!(core.get_instruction(2).unwrap(), Instruction::Spw.into());
        assert_eq!(core.get_instruction(3).unwrap(), Instruction::Jmp(-1).into());
    }

    #[test]
    fn test_place_rejects_oversized_sequence() {
        let mut core = Core::new(4).unwrap();
        assert!(!core.place(&ancestor(), 0).unwrap());
        assert_eq!(core.occupied(), 0);
    }

    #[test]
    fn test_read_range_round_trip() {
        let mut core = Core::new(10).unwrap();
        core.place(&ancestor(), 7).unwrap();
        let cells: Vec<CellValue> = ancestor().into_iter().map(CellValue::from).collect();
        assert_eq!(core.read_range(7, 5), cells);
    }

    #[test]
    fn test_read_range_invalid_is_empty() {
        let core = Core::new(10).unwrap();
        assert!(core.read_range(10, 2).is_empty());
        assert!(core.read_range(0, 11).is_empty());
    }

    #[test]
    fn test_remove_is_best_effort() {
        let mut core = Core::new(10).unwrap();
        core.place(&ancestor(), 8).unwrap();

        core.remove(42, 5);
        core.remove(0, 50);
        assert_eq!(core.occupied(), 5);

        core.remove(8, 3);
        assert_eq!(core.occupied(), 2);
        assert_eq!(core.get_instruction(0).unwrap(), CellValue::Empty);
        assert_eq!(core.get_instruction(1).unwrap(), Instruction::Nop.into());
    }

    #[test]
    fn test_region_classification() {
        let mut core = Core::new(10).unwrap();
        core.place(&[Instruction::Nop; 3], 0).unwrap();
        core.set_instruction(5, Instruction::Spw.into()).unwrap();

        assert_eq!(core.region(0, 3), Some(Region::Sled));
        assert_eq!(core.region(6, 4), Some(Region::Vacant));
        assert_eq!(core.region(2, 2), None);
        assert_eq!(core.region(4, 2), None);
        assert_eq!(core.region(0, 0), None);
    }

    #[test]
    fn test_swap_requires_two_occupied_cells() {
        let mut core = Core::new(10).unwrap();
        core.set_instruction(1, Instruction::Spw.into()).unwrap();
        core.set_instruction(2, Instruction::Cpn.into()).unwrap();

        assert!(!core.swap_occupied(1, 3).unwrap());
        assert!(core.swap_occupied(1, 2).unwrap());
        assert_eq!(core.get_instruction(1).unwrap(), Instruction::Cpn.into());
        assert_eq!(core.get_instruction(2).unwrap(), Instruction::Spw.into());
    }
}
