//! Generated puzzle shapes. Construction lives in `reframe-core::puzzle`.

use crate::shape::Shape;

pub const PATTERN_GRID_CELLS: usize = 9;
pub const RELIEF_GRID_CELLS: usize = 16;

/// One cell of the pattern grid. `None` is the empty cell the user must fill.
pub type Cell = Option<Shape>;

/// 3x3 pattern grid, row-major.
pub type PatternGrid = [Cell; PATTERN_GRID_CELLS];

/// Pattern-alignment puzzle: one empty cell, three candidates, one correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPuzzle {
    grid: PatternGrid,
    missing_index: usize,
    answer: Shape,
    candidates: [Shape; 3],
}

impl PatternPuzzle {
    /// Builds a puzzle from parts the caller guarantees are consistent:
    /// the missing cell is the only empty cell and the answer is exactly one
    /// of three distinct candidates. Checked in debug builds.
    #[must_use]
    pub fn new(
        grid: PatternGrid,
        missing_index: usize,
        answer: Shape,
        candidates: [Shape; 3],
    ) -> Self {
        let puzzle = Self {
            grid,
            missing_index,
            answer,
            candidates,
        };
        debug_assert!(puzzle.is_well_formed(), "inconsistent pattern puzzle");
        puzzle
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let empties = self.grid.iter().filter(|cell| cell.is_none()).count();
        self.missing_index < PATTERN_GRID_CELLS
            && self.grid[self.missing_index].is_none()
            && empties == 1
            && exactly_once(&self.candidates, self.answer)
            && all_distinct(&self.candidates)
    }

    #[must_use]
    pub fn grid(&self) -> &PatternGrid {
        &self.grid
    }

    #[must_use]
    pub fn missing_index(&self) -> usize {
        self.missing_index
    }

    #[must_use]
    pub fn answer(&self) -> Shape {
        self.answer
    }

    #[must_use]
    pub fn candidates(&self) -> &[Shape; 3] {
        &self.candidates
    }

    #[must_use]
    pub fn is_correct(&self, shape: Shape) -> bool {
        shape == self.answer
    }
}

fn exactly_once(candidates: &[Shape], answer: Shape) -> bool {
    candidates.iter().filter(|c| **c == answer).count() == 1
}

fn all_distinct(candidates: &[Shape]) -> bool {
    candidates
        .iter()
        .enumerate()
        .all(|(i, a)| candidates[i + 1..].iter().all(|b| a != b))
}

/// One puzzle of the relief set: place `answer` into `target_index` of a 4x4 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefPuzzle {
    answer: Shape,
    target_index: usize,
    candidates: [Shape; 4],
}

impl ReliefPuzzle {
    /// Caller guarantees the target is inside the 4x4 grid and the answer is
    /// exactly one of four distinct candidates. Checked in debug builds.
    #[must_use]
    pub fn new(answer: Shape, target_index: usize, candidates: [Shape; 4]) -> Self {
        let puzzle = Self {
            answer,
            target_index,
            candidates,
        };
        debug_assert!(puzzle.is_well_formed(), "inconsistent relief puzzle");
        puzzle
    }

    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.target_index < RELIEF_GRID_CELLS
            && exactly_once(&self.candidates, self.answer)
            && all_distinct(&self.candidates)
    }

    #[must_use]
    pub fn answer(&self) -> Shape {
        self.answer
    }

    #[must_use]
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    #[must_use]
    pub fn candidates(&self) -> &[Shape; 4] {
        &self.candidates
    }

    #[must_use]
    pub fn is_correct(&self, shape: Shape) -> bool {
        shape == self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::{PATTERN_GRID_CELLS, PatternPuzzle, ReliefPuzzle, Shape};

    fn grid_with_gap(gap: usize) -> [Option<Shape>; PATTERN_GRID_CELLS] {
        std::array::from_fn(|i| (i != gap).then_some(Shape::ALL[i % Shape::ALL.len()]))
    }

    #[test]
    fn pattern_puzzle_checks_single_empty_cell() {
        let candidates = [Shape::Star, Shape::Circle, Shape::Cross];
        let puzzle = PatternPuzzle::new(grid_with_gap(4), 4, Shape::Circle, candidates);
        assert!(puzzle.is_well_formed());
        assert!(puzzle.is_correct(Shape::Circle));
        assert!(!puzzle.is_correct(Shape::Star));
    }

    #[test]
    fn relief_puzzle_checks_target_and_candidates() {
        let candidates = [Shape::Star, Shape::Circle, Shape::Cross, Shape::Square];
        let puzzle = ReliefPuzzle::new(Shape::Cross, 15, candidates);
        assert!(puzzle.is_well_formed());
        assert_eq!(puzzle.target_index(), 15);
    }
}
