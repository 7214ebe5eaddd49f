//! Pattern-alignment run: pick the shape that completes the grid.

use std::time::Duration;

use reframe_core::Timeline;
use reframe_types::{PatternPuzzle, Shape, ToastKind};

use super::{ExerciseEvent, ExerciseOutcome, Outbox};

const CONCLUDE_DELAY: Duration = Duration::from_millis(1500);

pub const CORRECT_TOAST: &str = "Alignment achieved!";
pub const INCORRECT_TOAST: &str = "Not quite. Try to see the pattern.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceResult {
    /// The run is locked, paused, or the shape is not a candidate.
    Ignored,
    Correct,
    Incorrect,
}

#[derive(Debug)]
pub struct PatternPuzzleRun {
    puzzle: PatternPuzzle,
    timeline: Timeline<ExerciseOutcome>,
    selected: Option<Shape>,
    focused: usize,
    cancelled: bool,
    outbox: Outbox,
}

impl PatternPuzzleRun {
    #[must_use]
    pub fn new(puzzle: PatternPuzzle) -> Self {
        Self {
            puzzle,
            timeline: Timeline::new(),
            selected: None,
            focused: 0,
            cancelled: false,
            outbox: Outbox::default(),
        }
    }

    /// Lock in a candidate. Only the first choice counts.
    pub fn choose(&mut self, shape: Shape) -> ChoiceResult {
        if self.cancelled || self.selected.is_some() || !self.puzzle.candidates().contains(&shape) {
            return ChoiceResult::Ignored;
        }
        self.selected = Some(shape);

        let (result, outcome) = if self.puzzle.is_correct(shape) {
            self.outbox.toast(CORRECT_TOAST, ToastKind::Success);
            (ChoiceResult::Correct, ExerciseOutcome::Success)
        } else {
            self.outbox.toast(INCORRECT_TOAST, ToastKind::Error);
            (ChoiceResult::Incorrect, ExerciseOutcome::Failure)
        };
        tracing::debug!(%shape, ?result, "Pattern choice");
        self.timeline.schedule(CONCLUDE_DELAY, outcome);
        result
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.puzzle.candidates().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.puzzle.candidates().len();
        self.focused = (self.focused + len - 1) % len;
    }

    pub fn activate_focused(&mut self) -> ChoiceResult {
        let shape = self.puzzle.candidates()[self.focused];
        self.choose(shape)
    }

    pub fn advance(&mut self, delta: Duration) {
        let until = self.timeline.now().saturating_add(delta);
        while let Some((_, outcome)) = self.timeline.pop_due(until) {
            if !self.cancelled {
                self.outbox.conclude(outcome);
            }
        }
        self.timeline.settle(until);
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.timeline.clear();
    }

    pub fn take_events(&mut self) -> Vec<ExerciseEvent> {
        self.outbox.take()
    }

    /// Whether the outcome has been reported. A finished run never reports again.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.outbox.is_concluded()
    }

    #[must_use]
    pub fn puzzle(&self) -> &PatternPuzzle {
        &self.puzzle
    }

    #[must_use]
    pub fn selected(&self) -> Option<Shape> {
        self.selected
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }

    /// Feedback line under the grid once a choice is locked in.
    #[must_use]
    pub fn status(&self) -> Option<&'static str> {
        self.selected.map(|shape| {
            if self.puzzle.is_correct(shape) {
                CORRECT_TOAST
            } else {
                INCORRECT_TOAST
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ChoiceResult, PatternPuzzleRun};
    use crate::exercises::{ExerciseEvent, ExerciseOutcome};
    use reframe_types::{PatternPuzzle, Shape};
    use std::time::Duration;

    fn puzzle() -> PatternPuzzle {
        let mut grid = [Some(Shape::Circle); 9];
        grid[4] = None;
        PatternPuzzle::new(
            grid,
            4,
            Shape::Star,
            [Shape::Square, Shape::Star, Shape::Cross],
        )
    }

    fn outcomes(run: &mut PatternPuzzleRun) -> Vec<ExerciseOutcome> {
        run.take_events()
            .into_iter()
            .filter_map(|event| match event {
                ExerciseEvent::Finished(outcome) => Some(outcome),
                ExerciseEvent::Toast { .. } => None,
            })
            .collect()
    }

    #[test]
    fn correct_choice_succeeds_after_delay() {
        let mut run = PatternPuzzleRun::new(puzzle());
        assert_eq!(run.choose(Shape::Star), ChoiceResult::Correct);
        assert_eq!(run.status(), Some("Alignment achieved!"));
        run.advance(Duration::from_millis(1499));
        assert!(outcomes(&mut run).is_empty());
        run.advance(Duration::from_millis(1));
        assert_eq!(outcomes(&mut run), vec![ExerciseOutcome::Success]);
    }

    #[test]
    fn incorrect_choice_fails_and_locks() {
        let mut run = PatternPuzzleRun::new(puzzle());
        assert_eq!(run.choose(Shape::Cross), ChoiceResult::Incorrect);
        assert_eq!(run.choose(Shape::Star), ChoiceResult::Ignored);
        run.advance(Duration::from_secs(5));
        assert_eq!(outcomes(&mut run), vec![ExerciseOutcome::Failure]);
    }

    #[test]
    fn non_candidate_is_ignored() {
        let mut run = PatternPuzzleRun::new(puzzle());
        assert_eq!(run.choose(Shape::Hexagon), ChoiceResult::Ignored);
        assert_eq!(run.selected(), None);
    }

    #[test]
    fn focus_wraps_and_activates() {
        let mut run = PatternPuzzleRun::new(puzzle());
        run.focus_prev();
        assert_eq!(run.focused(), 2);
        run.focus_prev();
        assert_eq!(run.activate_focused(), ChoiceResult::Correct);
    }

    #[test]
    fn cancel_drops_pending_outcome() {
        let mut run = PatternPuzzleRun::new(puzzle());
        run.choose(Shape::Star);
        run.cancel();
        run.advance(Duration::from_secs(5));
        assert!(outcomes(&mut run).is_empty());
    }
}
