//! Keyboard-driven walk through the terminal front end.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use reframe_engine::{ActiveExercise, ReliefSubStage, Stage, Theme};
use reframe_tui::{ViewState, apply_key, draw};

use crate::common::{Harness, ms};

struct Session {
    h: Harness,
    view: ViewState,
}

impl Session {
    fn new() -> Self {
        let h = Harness::new();
        let view = ViewState::new(h.app.flow().state());
        Self { h, view }
    }

    fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        apply_key(&mut self.h.app, &mut self.view, KeyEvent::new(code, modifiers))
    }

    fn press(&mut self, code: KeyCode) -> bool {
        self.key(code, KeyModifiers::NONE)
    }

    fn ctrl(&mut self, c: char) -> bool {
        self.key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn frames(&mut self, total: Duration) {
        let step = ms(8);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.h.tick(step);
            self.view.sync(self.h.app.flow().state(), step);
            elapsed += step;
        }
    }

    fn render(&self) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| draw(frame, &self.h.app, &self.view))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn stage(&self) -> Stage {
        self.h.app.flow().state().current_stage
    }
}

#[test]
fn keyboard_walk_from_slider_to_journal() {
    let mut s = Session::new();

    s.press(KeyCode::Up);
    s.press(KeyCode::Up);
    s.press(KeyCode::Up);
    s.press(KeyCode::Enter);
    s.frames(ms(16));
    assert_eq!(s.stage(), Stage::PerceptionWorkshop);
    assert_eq!(s.h.app.flow().state().willingness_score.value(), 80);

    s.type_text("I failed again");
    for _ in 0..5 {
        s.press(KeyCode::Tab);
    }
    s.type_text("mistakes fade");
    for _ in 0..4 {
        s.press(KeyCode::PageUp);
    }
    s.ctrl('s');
    let workshop = &s.h.app.flow().state().workshop;
    assert_eq!(workshop.interpretation, "I failed again");
    let anchored = workshop.anchored_frame.as_ref().unwrap();
    assert_eq!(anchored.completion, "mistakes fade");
    assert_eq!(u8::from(anchored.rating), 4);

    s.ctrl('n');
    s.frames(ms(16));
    assert_eq!(s.stage(), Stage::ClarityReflection);

    s.ctrl('n');
    assert_eq!(s.stage(), Stage::ClarityReflection);
    s.type_text("slow down");
    s.ctrl('n');
    s.frames(ms(16));
    assert_eq!(s.stage(), Stage::ImmediateReliefPractice);

    s.press(KeyCode::Enter);
    assert_eq!(
        s.h.app.flow().state().relief_sub_stage,
        ReliefSubStage::PatternPuzzleRelief
    );
    for _ in 0..3 {
        let ActiveExercise::ReliefPuzzles(run) = s.h.app.exercise() else {
            panic!("expected relief puzzles");
        };
        let puzzle = run.current();
        let index = puzzle
            .candidates()
            .iter()
            .position(|shape| *shape == puzzle.answer())
            .unwrap();
        let key = char::from_digit(u32::try_from(index + 1).unwrap(), 10).unwrap();
        s.press(KeyCode::Char(key));
        s.frames(ms(808));
    }
    assert_eq!(s.stage(), Stage::ReinforcementBecoming);
    assert!(s.render().contains("Journal entries: 1"));

    s.press(KeyCode::Enter);
    s.frames(ms(16));
    assert_eq!(s.stage(), Stage::WillingnessCalibration);

    s.ctrl('l');
    let screen = s.render();
    assert!(screen.contains("Journal (1)"));
    assert!(screen.contains("mistakes fade"));

    s.press(KeyCode::Esc);
    assert!(!s.view.is_journal_open());
}

#[test]
fn theme_toggle_and_quit_work_from_any_stage() {
    let mut s = Session::new();
    assert_eq!(s.h.app.flow().state().theme, Theme::Dark);

    s.ctrl('t');
    assert_eq!(s.h.app.flow().state().theme, Theme::Light);
    assert!(s.render().contains("theme: light"));

    s.press(KeyCode::End);
    s.press(KeyCode::Enter);
    s.frames(ms(16));
    s.ctrl('t');
    assert_eq!(s.h.app.flow().state().theme, Theme::Dark);

    assert!(!s.press(KeyCode::Char('q')));
    assert!(s.ctrl('q'));
}

#[test]
fn breath_keys_start_pause_and_leave() {
    let mut s = Session::new();
    let flow = s.h.app.flow_mut();
    flow.set_willingness_score(90);
    flow.proceed_from_workshop();
    flow.set_clarity_text("here");
    flow.proceed_from_clarity();
    s.frames(ms(16));

    s.press(KeyCode::Down);
    s.press(KeyCode::Enter);
    assert!(matches!(s.h.app.exercise(), ActiveExercise::Breath(_)));

    s.press(KeyCode::Enter);
    s.frames(ms(100));
    assert_eq!(s.h.speech.spoken(), ["Breathe in"]);
    assert!(s.render().contains("Breathe in"));

    s.press(KeyCode::Char(' '));
    let ActiveExercise::Breath(cue) = s.h.app.exercise() else {
        panic!("expected breath cue");
    };
    assert!(!cue.is_running());

    s.press(KeyCode::Esc);
    s.frames(ms(16));
    assert_eq!(s.h.app.flow().state().relief_sub_stage, ReliefSubStage::Menu);
    assert!(matches!(s.h.app.exercise(), ActiveExercise::None));
}
