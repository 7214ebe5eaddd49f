//! Per-stage body rendering.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap},
};

use reframe_engine::{
    ActiveExercise, App, BreathCue, BreathPhase, EvidenceKind, PatternPuzzleRun, ReliefPuzzleRun,
    ReliefSubStage, SequencePhase, SequenceTap, Stage,
};
use reframe_types::{
    ClarityReflection, PATTERN_GRID_CELLS, RELIEF_GRID_CELLS, Rating, RecorderState, Shape,
    WillingnessScore, WorkshopData,
};

use crate::theme::{Glyphs, Palette, styles};
use crate::view::{RELIEF_MENU, ViewState, WorkshopField};

const PATTERN_COLUMNS: usize = 3;
const RELIEF_COLUMNS: usize = 4;
const PAD_COLUMNS: usize = 3;

pub(crate) fn draw_body(
    frame: &mut Frame,
    app: &App,
    view: &ViewState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let stage = app.flow().state().current_stage;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(format!(" {} ", stage.title()), styles::title(palette)))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match stage {
        Stage::WillingnessCalibration => draw_willingness(frame, view, inner, palette),
        Stage::OpennessPrimer => draw_primer(frame, app, inner, palette, glyphs),
        Stage::PerceptionWorkshop => draw_workshop(frame, app, view, inner, palette, glyphs),
        Stage::ClarityReflection => draw_clarity(frame, app, view, inner, palette, glyphs),
        Stage::ImmediateReliefPractice => draw_relief(frame, app, view, inner, palette, glyphs),
        Stage::ReinforcementBecoming => draw_reinforcement(frame, app, inner, palette, glyphs),
    }
}

fn paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

fn shape_style(palette: &Palette, shape: Shape) -> Style {
    let color = match shape {
        Shape::Circle => palette.accent,
        Shape::Square => palette.info,
        Shape::Triangle => palette.success,
        Shape::Star => palette.warning,
        Shape::Hexagon => palette.primary,
        Shape::Cross => palette.peach,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ============================================================================
// Willingness
// ============================================================================

fn draw_willingness(frame: &mut Frame, view: &ViewState, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let prompt = paragraph(vec![
        Line::from(""),
        Line::from(Span::styled(
            "How willing are you to see this situation differently right now?",
            styles::body(palette),
        )),
    ]);
    frame.render_widget(prompt, chunks[0]);

    let draft = view.willingness_draft();
    let score = WillingnessScore::clamped(draft);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.primary).bg(palette.bg_highlight))
        .ratio(f64::from(score.value()) / f64::from(WillingnessScore::MAX))
        .label(format!("{}%", score.value()));
    frame.render_widget(gauge, chunks[1]);

    let hint = paragraph(vec![
        Line::from(""),
        Line::from(Span::styled(
            score.band().hint().to_string(),
            styles::muted(palette).add_modifier(Modifier::ITALIC),
        )),
    ]);
    frame.render_widget(hint, chunks[3]);
}

// ============================================================================
// Openness primer
// ============================================================================

fn draw_primer(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let remaining = app.flow().remaining_primer_attempts();
    let mut lines = vec![
        Line::from(Span::styled(
            "A short exercise to open up your perspective.",
            styles::body(palette),
        )),
        Line::from(Span::styled(
            format!("You have {remaining} attempt(s) remaining"),
            styles::muted(palette),
        )),
        Line::from(""),
    ];

    match app.exercise() {
        ActiveExercise::PrimerPattern(run) => pattern_lines(run, palette, glyphs, &mut lines),
        ActiveExercise::PrimerSequence(tap) => {
            sequence_lines(tap, app.is_audio_pending(), palette, glyphs, &mut lines);
        }
        _ => lines.push(Line::from(Span::styled("Preparing…", styles::muted(palette)))),
    }

    frame.render_widget(paragraph(lines), area);
}

fn pattern_lines(
    run: &PatternPuzzleRun,
    palette: &Palette,
    glyphs: &Glyphs,
    lines: &mut Vec<Line<'static>>,
) {
    let puzzle = run.puzzle();
    lines.push(Line::from(Span::styled(
        "Which shape completes the pattern?",
        styles::body(palette),
    )));
    lines.push(Line::from(""));

    for row in 0..PATTERN_GRID_CELLS / PATTERN_COLUMNS {
        let mut spans = vec![Span::raw("   ")];
        for col in 0..PATTERN_COLUMNS {
            let index = row * PATTERN_COLUMNS + col;
            let span = match (puzzle.grid()[index], run.selected()) {
                (Some(shape), _) => {
                    Span::styled(format!(" {} ", glyphs.shape(shape)), shape_style(palette, shape))
                }
                (None, Some(chosen)) => {
                    let color = if puzzle.is_correct(chosen) {
                        palette.success
                    } else {
                        palette.error
                    };
                    Span::styled(
                        format!(" {} ", glyphs.shape(chosen)),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                }
                (None, None) => Span::styled(
                    format!(" {} ", glyphs.empty_cell),
                    styles::key_highlight(palette),
                ),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    let mut candidates = vec![Span::raw("   ")];
    for (i, shape) in puzzle.candidates().iter().enumerate() {
        let style = if i == run.focused() && run.selected().is_none() {
            styles::focused(palette)
        } else {
            shape_style(palette, *shape)
        };
        candidates.push(Span::styled(
            format!(" {}:{} ", i + 1, glyphs.shape(*shape)),
            style,
        ));
        candidates.push(Span::raw(" "));
    }
    lines.push(Line::from(candidates));

    if let Some(status) = run.status() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(status, styles::muted(palette))));
    }
}

fn sequence_lines(
    tap: &SequenceTap,
    audio_pending: bool,
    palette: &Palette,
    glyphs: &Glyphs,
    lines: &mut Vec<Line<'static>>,
) {
    let status = if audio_pending {
        "Preparing audio…"
    } else {
        tap.status()
    };
    lines.push(Line::from(Span::styled(status, styles::body(palette))));
    if tap.phase() == SequencePhase::AwaitingInput {
        lines.push(Line::from(Span::styled(
            format!("Step {} of {}", tap.entered() + 1, tap.sequence().len()),
            styles::muted(palette),
        )));
    }
    lines.push(Line::from(""));

    let interactive = tap.phase() == SequencePhase::AwaitingInput;
    let positions: Vec<usize> = (0..tap.positions()).collect();
    for row in positions.chunks(PAD_COLUMNS) {
        let mut spans = vec![Span::raw("   ")];
        for &position in row {
            let glyph = if tap.is_lit(position) {
                glyphs.pad_on
            } else {
                glyphs.pad_off
            };
            let style = if tap.is_lit(position) {
                styles::lit(palette)
            } else if interactive && position == tap.focused() {
                styles::focused(palette)
            } else {
                styles::body(palette)
            };
            spans.push(Span::styled(format!(" {} {} ", position + 1, glyph), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
}

// ============================================================================
// Perception workshop
// ============================================================================

fn draw_workshop(
    frame: &mut Frame,
    app: &App,
    view: &ViewState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let workshop = &app.flow().state().workshop;
    let focus = view.workshop_focus(workshop);
    let (lines, focus_line) = workshop_lines(workshop, focus, palette, glyphs);

    // Keep the focused field on screen.
    let height = usize::from(area.height.max(1));
    let scroll = focus_line.saturating_sub(height.saturating_sub(3));
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    frame.render_widget(paragraph(lines).scroll((scroll, 0)), area);
}

fn workshop_lines(
    workshop: &WorkshopData,
    focus: WorkshopField,
    palette: &Palette,
    glyphs: &Glyphs,
) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut focus_line = 0;

    let mut field = |lines: &mut Vec<Line<'static>>, label: String, text: &str, this: WorkshopField| {
        let focused = this == focus;
        if focused {
            focus_line = lines.len();
        }
        lines.push(field_line(label, text, focused, palette, glyphs));
    };

    lines.push(section("What story are you telling yourself?", palette));
    field(
        &mut lines,
        String::new(),
        &workshop.interpretation,
        WorkshopField::Interpretation,
    );
    lines.push(Line::from(""));

    for (kind, title) in [
        (EvidenceKind::Against, "Evidence against this story"),
        (EvidenceKind::For, "Evidence for this story"),
    ] {
        lines.push(section(title, palette));
        for (index, text) in workshop.evidence(kind).iter().enumerate() {
            field(
                &mut lines,
                format!("{}. ", index + 1),
                text,
                WorkshopField::Evidence(kind, index),
            );
        }
        lines.push(Line::from(""));
    }

    lines.push(section("Alternative frames", palette));
    for frame in &workshop.alternative_frames {
        let this = WorkshopField::Frame(frame.id());
        field(
            &mut lines,
            format!("{} ", frame.template()),
            &frame.completion,
            this,
        );
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(rating_stars(frame.rating, glyphs), styles::key_highlight(palette)),
        ]));
    }

    if let Some(anchored) = &workshop.anchored_frame {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{} Anchored: ", glyphs.bullet), styles::title(palette)),
            Span::styled(anchored.full_text.clone(), styles::body(palette)),
        ]));
    }

    (lines, focus_line)
}

fn section(title: &'static str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(palette.text_secondary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field_line(
    label: String,
    text: &str,
    focused: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let marker = if focused { glyphs.selected } else { " " };
    let mut spans = vec![
        Span::styled(format!("{marker} "), styles::key_highlight(palette)),
        Span::styled(label, styles::muted(palette)),
    ];
    let body_style = if focused {
        styles::focused(palette)
    } else {
        styles::body(palette)
    };
    if text.is_empty() && !focused {
        spans.push(Span::styled("…", styles::muted(palette)));
    } else {
        spans.push(Span::styled(text.to_string(), body_style));
    }
    if focused {
        spans.push(Span::styled(glyphs.cursor, styles::key_highlight(palette)));
    }
    Line::from(spans)
}

fn rating_stars(rating: Rating, glyphs: &Glyphs) -> String {
    let on = usize::from(rating.value());
    let off = usize::from(Rating::MAX).saturating_sub(on);
    format!("{}{}", glyphs.rating_on.repeat(on), glyphs.rating_off.repeat(off))
}

// ============================================================================
// Clarity reflection
// ============================================================================

fn draw_clarity(
    frame: &mut Frame,
    app: &App,
    view: &ViewState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    frame.render_widget(
        paragraph(vec![Line::from(Span::styled(
            "What feels clearer now? Write it down or record a short note.",
            styles::body(palette),
        ))]),
        chunks[0],
    );

    let mut text: Vec<Line<'static>> = view
        .clarity_draft()
        .split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), styles::body(palette))))
        .collect();
    if let Some(last) = text.last_mut() {
        last.push_span(Span::styled(glyphs.cursor, styles::key_highlight(palette)));
    }
    let editor = paragraph(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.accent)),
    );
    frame.render_widget(editor, chunks[1]);

    let status = match (&app.flow().state().clarity, app.recorder_state()) {
        (_, RecorderState::Recording) => Line::from(Span::styled(
            format!("{} Recording… press Ctrl+R to stop", glyphs.recording),
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        )),
        (ClarityReflection::Audio(clip), _) => Line::from(Span::styled(
            format!(
                "{} Audio note saved ({})",
                glyphs.toast_success,
                format_duration(clip.duration)
            ),
            Style::default().fg(palette.success),
        )),
        _ if !app.recorder_supported() => Line::from(Span::styled(
            "Audio recording is not available in this terminal.",
            styles::muted(palette),
        )),
        _ => Line::from(""),
    };
    frame.render_widget(paragraph(vec![status]), chunks[2]);
}

// ============================================================================
// Immediate relief
// ============================================================================

fn draw_relief(
    frame: &mut Frame,
    app: &App,
    view: &ViewState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    match (app.flow().state().relief_sub_stage, app.exercise()) {
        (ReliefSubStage::PatternPuzzleRelief, ActiveExercise::ReliefPuzzles(run)) => {
            draw_relief_puzzles(frame, run, area, palette, glyphs);
        }
        (ReliefSubStage::AudioBreatheRelief, ActiveExercise::Breath(cue)) => {
            draw_breath(frame, cue, app.is_audio_pending(), area, palette, glyphs);
        }
        _ => draw_relief_menu(frame, view, area, palette, glyphs),
    }
}

fn draw_relief_menu(
    frame: &mut Frame,
    view: &ViewState,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Choose a short practice to settle your mind.",
            styles::body(palette),
        )),
        Line::from(""),
    ];
    for (index, kind) in RELIEF_MENU.iter().enumerate() {
        let (title, description) = match kind {
            reframe_types::ReliefExercise::PatternPuzzle => (
                "Pattern Puzzles",
                "Three quick matches against a one-minute timer.",
            ),
            reframe_types::ReliefExercise::AudioBreathe => (
                "Guided Breathing",
                "Inhale, hold, exhale and rest with gentle cues.",
            ),
        };
        let selected = index == view.relief_selection_index();
        let marker = if selected { glyphs.selected } else { " " };
        let style = if selected {
            styles::focused(palette)
        } else {
            styles::body(palette)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), styles::key_highlight(palette)),
            Span::styled(format!("{}. {title}", index + 1), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {description}"),
            styles::muted(palette),
        )));
    }
    frame.render_widget(paragraph(lines), area);
}

fn draw_relief_puzzles(
    frame: &mut Frame,
    run: &ReliefPuzzleRun,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let puzzle = run.current();
    let shown = (run.index() + 1).min(run.len());
    let clock = if run.is_paused() {
        format!("{} {}", glyphs.paused, format_duration(run.remaining()))
    } else {
        format!("{} {}", glyphs.running, format_duration(run.remaining()))
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("Puzzle {shown} of {}", run.len()), styles::body(palette)),
            Span::raw("   "),
            Span::styled(clock, styles::key_highlight(palette)),
        ]),
        Line::from(Span::styled(
            format!("Place the {} into the marked cell.", puzzle.answer()),
            styles::muted(palette),
        )),
        Line::from(""),
    ];

    for row in 0..RELIEF_GRID_CELLS / RELIEF_COLUMNS {
        let mut spans = vec![Span::raw("   ")];
        for col in 0..RELIEF_COLUMNS {
            let index = row * RELIEF_COLUMNS + col;
            let span = if index != puzzle.target_index() {
                Span::styled(format!(" {} ", glyphs.blank_cell), styles::muted(palette))
            } else if run.feedback() == Some(true) {
                Span::styled(
                    format!(" {} ", glyphs.shape(puzzle.answer())),
                    Style::default()
                        .fg(palette.success)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    format!(" {} ", glyphs.empty_cell),
                    styles::key_highlight(palette),
                )
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    let mut candidates = vec![Span::raw("   ")];
    for (i, shape) in puzzle.candidates().iter().enumerate() {
        let style = if i == run.focused() {
            styles::focused(palette)
        } else {
            shape_style(palette, *shape)
        };
        candidates.push(Span::styled(
            format!(" {}:{} ", i + 1, glyphs.shape(*shape)),
            style,
        ));
        candidates.push(Span::raw(" "));
    }
    lines.push(Line::from(candidates));

    match run.feedback() {
        Some(true) => lines.push(Line::from(Span::styled(
            "Correct!",
            Style::default().fg(palette.success),
        ))),
        Some(false) => lines.push(Line::from(Span::styled(
            "Try again!",
            Style::default().fg(palette.error),
        ))),
        None if run.is_paused() => {
            lines.push(Line::from(Span::styled("Paused", styles::muted(palette))));
        }
        None => {}
    }

    frame.render_widget(paragraph(lines), area);
}

fn draw_breath(
    frame: &mut Frame,
    cue: &BreathCue,
    audio_pending: bool,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let headline = if audio_pending {
        "Preparing audio…"
    } else {
        cue.phase().cue().unwrap_or_else(|| cue.prompt())
    };
    frame.render_widget(
        paragraph(vec![
            Line::from(""),
            Line::from(Span::styled(headline, styles::title(palette))),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let phase_color = match cue.phase() {
        BreathPhase::Inhaling => palette.accent,
        BreathPhase::Holding => palette.primary,
        BreathPhase::Exhaling => palette.success,
        BreathPhase::Resting | BreathPhase::Idle => palette.text_muted,
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(phase_color).bg(palette.bg_highlight))
        .ratio(f64::from(cue.phase_progress().clamp(0.0, 1.0)))
        .label(format_duration(cue.remaining()));
    frame.render_widget(gauge, chunks[1]);

    let state = if cue.is_running() {
        glyphs.running
    } else {
        glyphs.paused
    };
    let voice = if cue.voice() == reframe_types::settings::CueVoice::ChimeOnly {
        "chime only"
    } else {
        "spoken cues"
    };
    let detail = Line::from(vec![
        Span::styled(format!("{state} "), styles::key_highlight(palette)),
        Span::styled(cue.prompt(), styles::muted(palette)),
        Span::styled(format!("   ({voice})"), styles::muted(palette)),
    ]);
    frame.render_widget(
        paragraph(vec![detail]).alignment(Alignment::Center),
        chunks[2],
    );
}

// ============================================================================
// Reinforcement
// ============================================================================

fn draw_reinforcement(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let state = app.flow().state();
    let mut lines = vec![Line::from("")];

    if let Some(exit) = &state.exit_message {
        lines.push(Line::from(Span::styled(
            exit.clone(),
            Style::default().fg(palette.warning),
        )));
        lines.push(Line::from(""));
    }
    if let Some(message) = &state.final_reinforcement_message {
        lines.push(Line::from(Span::styled(message.clone(), styles::title(palette))));
        lines.push(Line::from(""));
    }
    if let Some(anchored) = &state.workshop.anchored_frame {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", glyphs.bullet), styles::key_highlight(palette)),
            Span::styled(anchored.full_text.clone(), styles::body(palette)),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("Journal entries: {}", state.journal.len()),
        styles::muted(palette),
    )));

    frame.render_widget(paragraph(lines).alignment(Alignment::Center), area);
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
