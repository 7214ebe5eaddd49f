//! Input handling for the Reframe TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use reframe_engine::{ActiveExercise, App, ReliefSubStage, SequencePhase, Stage};

use crate::view::{RELIEF_MENU, ViewState, WorkshopField};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Stem for frames the user adds beyond the defaults.
pub const CUSTOM_FRAME_TEMPLATE: &str = "Another way to see this is…";

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send in the input thread unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input. Returns `Ok(true)` when the user asked to quit.
pub fn handle_events(app: &mut App, view: &mut ViewState, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        processed += 1;

        if apply_event(app, view, ev) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn apply_event(app: &mut App, view: &mut ViewState, ev: Event) -> bool {
    match ev {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            apply_key(app, view, key)
        }
        Event::Paste(text) => {
            apply_paste(app, view, &text);
            false
        }
        _ => false,
    }
}

/// Apply one key press. Returns true when the user asked to quit.
pub fn apply_key(app: &mut App, view: &mut ViewState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c' | 'q') if ctrl => return true,
        KeyCode::Char('t') if ctrl => {
            app.flow_mut().toggle_theme();
            return false;
        }
        KeyCode::Char('l') if ctrl => {
            view.toggle_journal();
            return false;
        }
        _ => {}
    }

    if view.is_journal_open() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            view.close_journal();
        }
        return false;
    }

    match app.flow().state().current_stage {
        Stage::WillingnessCalibration => willingness_key(app, view, key),
        Stage::OpennessPrimer => primer_key(app, key),
        Stage::PerceptionWorkshop => workshop_key(app, view, key),
        Stage::ClarityReflection => clarity_key(app, view, key),
        Stage::ImmediateReliefPractice => relief_key(app, view, key),
        Stage::ReinforcementBecoming => reinforcement_key(app, view, key),
    }
    false
}

fn apply_paste(app: &mut App, view: &mut ViewState, text: &str) {
    let text = normalize_pasted(text);
    match app.flow().state().current_stage {
        Stage::PerceptionWorkshop => {
            let field = view.workshop_focus(&app.flow().state().workshop);
            let Some(current) = field.text(&app.flow().state().workshop) else {
                return;
            };
            let updated = format!("{current}{text}");
            write_field(app, field, updated);
        }
        Stage::ClarityReflection => {
            view.clarity_draft_mut().push_str(&text);
            app.flow_mut().set_clarity_text(view.clarity_draft().to_string());
        }
        _ => debug!("Ignoring paste outside a text stage"),
    }
}

fn normalize_pasted(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Insert or delete at the end of `text`. `None` when the key is not an edit.
fn edit_text(text: &str, key: KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut edited = text.to_string();
            edited.push(c);
            Some(edited)
        }
        KeyCode::Backspace => {
            let mut edited = text.to_string();
            edited.pop()?;
            Some(edited)
        }
        _ => None,
    }
}

fn digit(key: KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => c
            .to_digit(10)
            .and_then(|d| usize::try_from(d).ok())
            .filter(|d| *d > 0)
            .map(|d| d - 1),
        _ => None,
    }
}

// ============================================================================
// Stages
// ============================================================================

fn willingness_key(app: &mut App, view: &mut ViewState, key: KeyEvent) {
    match key.code {
        KeyCode::Left => view.nudge_willingness(-1),
        KeyCode::Right => view.nudge_willingness(1),
        KeyCode::Down | KeyCode::PageDown => view.nudge_willingness(-10),
        KeyCode::Up | KeyCode::PageUp => view.nudge_willingness(10),
        KeyCode::Home => view.nudge_willingness(-100),
        KeyCode::End => view.nudge_willingness(100),
        KeyCode::Enter => {
            let score = view.willingness_draft();
            debug!(score, "Willingness submitted");
            app.flow_mut().set_willingness_score(score);
        }
        _ => {}
    }
}

fn primer_key(app: &mut App, key: KeyEvent) {
    let awaiting_start = matches!(
        app.exercise(),
        ActiveExercise::PrimerSequence(tap) if tap.phase() == SequencePhase::AwaitingStart
    );
    if awaiting_start {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            app.start_sequence();
        }
        return;
    }

    match app.exercise_mut() {
        ActiveExercise::PrimerPattern(run) => match key.code {
            KeyCode::Left | KeyCode::BackTab => run.focus_prev(),
            KeyCode::Right | KeyCode::Tab => run.focus_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                run.activate_focused();
            }
            _ => {
                let shape = digit(key).and_then(|i| run.puzzle().candidates().get(i).copied());
                if let Some(shape) = shape {
                    run.choose(shape);
                }
            }
        },
        ActiveExercise::PrimerSequence(tap) => match key.code {
            KeyCode::Left | KeyCode::BackTab => tap.focus_prev(),
            KeyCode::Right | KeyCode::Tab => tap.focus_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                tap.activate_focused();
            }
            _ => {
                if let Some(position) = digit(key) {
                    tap.tap(position);
                }
            }
        },
        _ => {}
    }
}

fn workshop_key(app: &mut App, view: &mut ViewState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let field = view.workshop_focus(&app.flow().state().workshop);

    match key.code {
        KeyCode::Tab | KeyCode::Down => view.focus_next_field(&app.flow().state().workshop),
        KeyCode::BackTab | KeyCode::Up => view.focus_prev_field(&app.flow().state().workshop),
        KeyCode::PageUp | KeyCode::PageDown => {
            if let WorkshopField::Frame(id) = field {
                let current = app
                    .flow()
                    .state()
                    .workshop
                    .alternative_frames
                    .iter()
                    .find(|frame| frame.id() == id)
                    .map_or(0, |frame| i64::from(frame.rating.value()));
                let step = if key.code == KeyCode::PageUp { 1 } else { -1 };
                app.flow_mut().update_frame_rating(id, current + step);
            }
        }
        KeyCode::Char('a') if ctrl => {
            if let WorkshopField::Evidence(kind, _) = field {
                app.flow_mut().add_evidence_slot(kind);
            }
        }
        KeyCode::Char('d') if ctrl => {
            if let WorkshopField::Evidence(kind, index) = field {
                app.flow_mut().remove_evidence_slot(kind, index);
            }
        }
        KeyCode::Char('f') if ctrl => {
            let id = app.flow_mut().add_alternative_frame(CUSTOM_FRAME_TEMPLATE);
            view.focus_field(&app.flow().state().workshop, WorkshopField::Frame(id));
        }
        KeyCode::Char('s') if ctrl => {
            if let Err(e) = app.flow_mut().commit_and_anchor_frame() {
                debug!("Anchor rejected: {e}");
            }
        }
        KeyCode::Char('n') if ctrl => app.flow_mut().proceed_from_workshop(),
        _ => {
            if let (WorkshopField::Frame(id), Some(rating)) = (field, rating_key(key)) {
                app.flow_mut().update_frame_rating(id, rating);
                return;
            }
            let Some(current) = field.text(&app.flow().state().workshop) else {
                return;
            };
            if let Some(updated) = edit_text(current, key) {
                write_field(app, field, updated);
            }
        }
    }
}

/// Alt+0..5 sets a frame rating directly.
fn rating_key(key: KeyEvent) -> Option<i64> {
    if !key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => c.to_digit(10).map(i64::from),
        _ => None,
    }
}

fn write_field(app: &mut App, field: WorkshopField, text: String) {
    let flow = app.flow_mut();
    match field {
        WorkshopField::Interpretation => flow.update_interpretation(text),
        WorkshopField::Evidence(kind, index) => flow.update_evidence(kind, index, text),
        WorkshopField::Frame(id) => flow.update_frame_completion(id, text),
    }
}

fn clarity_key(app: &mut App, view: &mut ViewState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('r') if ctrl => app.toggle_recording(),
        KeyCode::Char('x') if ctrl => {
            view.clarity_draft_mut().clear();
            app.flow_mut().clear_clarity_reflection();
        }
        KeyCode::Char('n') if ctrl => {
            app.proceed_from_clarity();
        }
        KeyCode::Enter => {
            view.clarity_draft_mut().push('\n');
        }
        _ => {
            if let Some(updated) = edit_text(view.clarity_draft(), key) {
                *view.clarity_draft_mut() = updated;
                app.flow_mut().set_clarity_text(view.clarity_draft().to_string());
            }
        }
    }
}

fn relief_key(app: &mut App, view: &mut ViewState, key: KeyEvent) {
    match app.flow().state().relief_sub_stage {
        ReliefSubStage::Menu => match key.code {
            KeyCode::Up | KeyCode::BackTab => view.move_relief_selection(false),
            KeyCode::Down | KeyCode::Tab => view.move_relief_selection(true),
            KeyCode::Enter => app.start_relief(view.relief_selection()),
            _ => {
                if let Some(kind) = digit(key).and_then(|i| RELIEF_MENU.get(i).copied()) {
                    app.start_relief(kind);
                }
            }
        },
        ReliefSubStage::PatternPuzzleRelief => relief_puzzle_key(app, key),
        ReliefSubStage::AudioBreatheRelief => breath_key(app, key),
    }
}

fn relief_puzzle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('s')) {
        app.skip_relief_puzzle();
        return;
    }
    let ActiveExercise::ReliefPuzzles(run) = app.exercise_mut() else {
        return;
    };
    match key.code {
        KeyCode::Left | KeyCode::BackTab => run.focus_prev(),
        KeyCode::Right | KeyCode::Tab => run.focus_next(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            run.activate_focused();
        }
        KeyCode::Char('p') => run.toggle_pause(),
        _ => {
            let shape = digit(key).and_then(|i| run.current().candidates().get(i).copied());
            if let Some(shape) = shape {
                run.choose(shape);
            }
        }
    }
}

fn breath_key(app: &mut App, key: KeyEvent) {
    let running = matches!(app.exercise(), ActiveExercise::Breath(cue) if cue.is_running());
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            if running {
                app.stop_breath(false);
            } else {
                app.start_breath();
            }
        }
        KeyCode::Char('c') => app.toggle_chime_only(),
        KeyCode::Esc | KeyCode::Char('b') => app.stop_breath(true),
        _ => {}
    }
}

fn reinforcement_key(app: &mut App, view: &mut ViewState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.flow_mut().finish_module_and_reset(),
        KeyCode::Char('j') => view.toggle_journal(),
        _ => {}
    }
}
