//! Relief puzzle run: match the highlighted tile three times within a minute.
//!
//! Misses carry no penalty. The countdown pauses with the run, and running
//! out of time still completes the exercise.

use std::time::Duration;

use reframe_core::{RELIEF_SET_LEN, RandomSource, Timeline, TimerId, generate_relief_set};
use reframe_types::{ReliefPuzzle, Shape, ToastKind};

use super::{ChoiceResult, ExerciseEvent, ExerciseOutcome, Outbox};

const TIME_LIMIT: Duration = Duration::from_secs(60);
const TICK: Duration = Duration::from_secs(1);
const FEEDBACK: Duration = Duration::from_millis(800);

pub const CORRECT_TOAST: &str = "Correct!";
pub const MISS_TOAST: &str = "Try again!";
pub const COMPLETE_TOAST: &str = "Puzzle sequence complete!";
pub const TIMEOUT_TOAST: &str = "Time's up!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReliefTimer {
    Tick,
    FeedbackDone { correct: bool },
}

#[derive(Debug)]
pub struct ReliefPuzzleRun {
    puzzles: [ReliefPuzzle; RELIEF_SET_LEN],
    index: usize,
    timeline: Timeline<ReliefTimer>,
    tick: Option<TimerId>,
    remaining: Duration,
    paused: bool,
    /// Correctness of the choice currently being shown.
    feedback: Option<bool>,
    focused: usize,
    cancelled: bool,
    outbox: Outbox,
}

impl ReliefPuzzleRun {
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        Self::new(generate_relief_set(rng))
    }

    #[must_use]
    pub fn new(puzzles: [ReliefPuzzle; RELIEF_SET_LEN]) -> Self {
        let mut timeline = Timeline::new();
        let tick = Some(timeline.schedule(TICK, ReliefTimer::Tick));
        Self {
            puzzles,
            index: 0,
            timeline,
            tick,
            remaining: TIME_LIMIT,
            paused: false,
            feedback: None,
            focused: 0,
            cancelled: false,
            outbox: Outbox::default(),
        }
    }

    pub fn choose(&mut self, shape: Shape) -> ChoiceResult {
        if self.cancelled || self.paused || self.feedback.is_some() || self.outbox.is_concluded() {
            return ChoiceResult::Ignored;
        }
        let puzzle = &self.puzzles[self.index];
        if !puzzle.candidates().contains(&shape) {
            return ChoiceResult::Ignored;
        }

        let correct = puzzle.is_correct(shape);
        self.feedback = Some(correct);
        if correct {
            self.outbox
                .toast_for(CORRECT_TOAST, ToastKind::Success, FEEDBACK);
        } else {
            self.outbox.toast_for(MISS_TOAST, ToastKind::Error, FEEDBACK);
        }
        self.timeline
            .schedule(FEEDBACK, ReliefTimer::FeedbackDone { correct });
        if correct {
            ChoiceResult::Correct
        } else {
            ChoiceResult::Incorrect
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.current().candidates().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.current().candidates().len();
        self.focused = (self.focused + len - 1) % len;
    }

    pub fn activate_focused(&mut self) -> ChoiceResult {
        let shape = self.current().candidates()[self.focused];
        self.choose(shape)
    }

    pub fn toggle_pause(&mut self) {
        if self.cancelled || self.outbox.is_concluded() {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            if let Some(id) = self.tick.take() {
                self.timeline.cancel(id);
            }
        } else if self.tick.is_none() {
            self.tick = Some(self.timeline.schedule(TICK, ReliefTimer::Tick));
        }
        tracing::debug!(paused = self.paused, remaining = ?self.remaining, "Relief run pause toggled");
    }

    pub fn advance(&mut self, delta: Duration) {
        let until = self.timeline.now().saturating_add(delta);
        while let Some((id, timer)) = self.timeline.pop_due(until) {
            self.on_timer(id, timer);
        }
        self.timeline.settle(until);
    }

    fn on_timer(&mut self, id: TimerId, timer: ReliefTimer) {
        if self.cancelled || self.outbox.is_concluded() {
            return;
        }
        match timer {
            ReliefTimer::Tick => {
                if self.tick != Some(id) {
                    return;
                }
                self.remaining = self.remaining.saturating_sub(TICK);
                if self.remaining.is_zero() {
                    self.tick = None;
                    self.outbox.toast(TIMEOUT_TOAST, ToastKind::Info);
                    self.finish();
                } else {
                    self.tick = Some(self.timeline.schedule(TICK, ReliefTimer::Tick));
                }
            }
            ReliefTimer::FeedbackDone { correct } => {
                self.feedback = None;
                if !correct {
                    return;
                }
                if self.index + 1 < self.puzzles.len() {
                    self.index += 1;
                    self.focused = 0;
                } else {
                    self.outbox.toast(COMPLETE_TOAST, ToastKind::Success);
                    self.finish();
                }
            }
        }
    }

    fn finish(&mut self) {
        self.timeline.clear();
        self.tick = None;
        self.outbox.conclude(ExerciseOutcome::Success);
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.timeline.clear();
        self.tick = None;
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
    pub fn current(&self) -> &ReliefPuzzle {
        &self.puzzles[self.index]
    }

    /// Zero-based position in the set.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn feedback(&self) -> Option<bool> {
        self.feedback
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.focused
    }
}
