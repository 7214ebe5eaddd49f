//! Puzzle generators for the pattern-alignment and relief exercises.

use reframe_types::{
    PATTERN_GRID_CELLS, PatternGrid, PatternPuzzle, RELIEF_GRID_CELLS, ReliefPuzzle, Shape,
};

use crate::random::{RandomSource, shuffle};

/// Number of puzzles in one relief set.
pub const RELIEF_SET_LEN: usize = 3;

/// How many recent correct answers the relief set tries not to repeat.
const RELIEF_AVOID_RECENT: usize = 2;

/// Draw budget for the soft-avoid loop. Once spent, a repeat is accepted.
const RELIEF_PICK_ATTEMPTS: usize = Shape::ALL.len() * 2;

fn others_shuffled(rng: &mut dyn RandomSource, exclude: Shape) -> Vec<Shape> {
    let mut others: Vec<Shape> = Shape::ALL.into_iter().filter(|s| *s != exclude).collect();
    shuffle(rng, &mut others);
    others
}

/// 3x3 grid cycling through a shuffled shape pool with one random empty cell.
///
/// The eight filled cells take the pool in order, so the missing shape is the
/// next one in the cycle. Candidates are the answer plus two distinct
/// distractors, shuffled.
pub fn generate_pattern_puzzle(rng: &mut dyn RandomSource) -> PatternPuzzle {
    let mut pool = Shape::ALL;
    shuffle(rng, &mut pool);

    let missing_index = rng.below(PATTERN_GRID_CELLS);
    let mut grid: PatternGrid = [None; PATTERN_GRID_CELLS];
    let mut filled = 0;
    for (index, cell) in grid.iter_mut().enumerate() {
        if index != missing_index {
            *cell = Some(pool[filled % pool.len()]);
            filled += 1;
        }
    }
    let answer = pool[filled % pool.len()];

    let others = others_shuffled(rng, answer);
    let mut candidates = [answer, others[0], others[1]];
    shuffle(rng, &mut candidates);

    PatternPuzzle::new(grid, missing_index, answer, candidates)
}

/// Three relief puzzles. Each correct shape avoids the previous two correct
/// shapes when the draw budget allows.
pub fn generate_relief_set(rng: &mut dyn RandomSource) -> [ReliefPuzzle; RELIEF_SET_LEN] {
    let mut recent: Vec<Shape> = Vec::with_capacity(RELIEF_AVOID_RECENT + 1);
    std::array::from_fn(|_| {
        let mut answer = Shape::ALL[rng.below(Shape::ALL.len())];
        let mut attempts = 1;
        while recent.contains(&answer) && attempts < RELIEF_PICK_ATTEMPTS {
            answer = Shape::ALL[rng.below(Shape::ALL.len())];
            attempts += 1;
        }
        if recent.contains(&answer) {
            tracing::debug!(shape = %answer, "relief set accepted a repeated answer");
        } else {
            recent.push(answer);
            if recent.len() > RELIEF_AVOID_RECENT {
                recent.remove(0);
            }
        }

        let target_index = rng.below(RELIEF_GRID_CELLS);
        let others = others_shuffled(rng, answer);
        let mut candidates = [answer, others[0], others[1], others[2]];
        shuffle(rng, &mut candidates);

        ReliefPuzzle::new(answer, target_index, candidates)
    })
}
