//! TUI rendering for Reframe using ratatui.

mod effects;
mod input;
mod stages;
mod theme;
mod view;

pub use effects::{apply_toast_effect, is_flash_peak};
pub use input::{CUSTOM_FRAME_TEMPLATE, InputPump, apply_key, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};
pub use view::{RELIEF_MENU, ViewState, WorkshopField, workshop_fields};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use reframe_engine::{ActiveExercise, App, ReliefSubStage, SequencePhase, Stage, Theme};

const TOAST_MAX_WIDTH: u16 = 56;
const JOURNAL_MAX_WIDTH: u16 = 72;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App, view: &ViewState) {
    let options = app.ui_options();
    let theme = app.flow().state().theme;
    let palette = palette(theme, options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Stage body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette);
    stages::draw_body(frame, app, view, chunks[1], &palette, &glyphs);
    draw_key_hints(frame, app, chunks[2], &palette);

    if view.is_journal_open() {
        draw_journal(frame, app, &palette, &glyphs);
    }
    draw_toast(frame, app, view, &palette, &glyphs);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let stage = app.flow().state().current_stage;
    let theme = match app.flow().state().theme {
        Theme::Dark => "dark",
        Theme::Light => "light",
    };

    let mut progress = Vec::with_capacity(Stage::ALL.len() * 2);
    for candidate in Stage::ALL {
        let style = if candidate == stage {
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else if candidate.ordinal() < stage.ordinal() {
            Style::default().fg(palette.text_secondary)
        } else {
            Style::default().fg(palette.text_muted)
        };
        progress.push(Span::styled(format!("{}", candidate.ordinal() + 1), style));
        progress.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled("Reframe", styles::title(palette)),
            Span::styled(
                format!("  {}/{}  ", stage.ordinal() + 1, Stage::ALL.len()),
                styles::muted(palette),
            ),
            Span::styled(stage.title(), styles::body(palette)),
            Span::styled(format!("   theme: {theme}"), styles::muted(palette)),
        ]),
        Line::from(progress),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn key_hints(app: &App) -> &'static [(&'static str, &'static str)] {
    let state = app.flow().state();
    match state.current_stage {
        Stage::WillingnessCalibration => &[
            ("←/→", "adjust"),
            ("↑/↓", "±10"),
            ("Enter", "continue"),
        ],
        Stage::OpennessPrimer => match app.exercise() {
            ActiveExercise::PrimerSequence(tap) if tap.phase() == SequencePhase::AwaitingStart => {
                &[("Enter", "start")]
            }
            ActiveExercise::PrimerSequence(_) => {
                &[("1-9", "tap"), ("←/→", "focus"), ("Enter", "tap focused")]
            }
            _ => &[("1-3", "choose"), ("←/→", "focus"), ("Enter", "choose focused")],
        },
        Stage::PerceptionWorkshop => &[
            ("Tab", "next field"),
            ("PgUp/PgDn", "rate"),
            ("^A/^D", "add/remove evidence"),
            ("^F", "new frame"),
            ("^S", "anchor"),
            ("^N", "next"),
        ],
        Stage::ClarityReflection => &[
            ("type", "reflect"),
            ("^R", "record"),
            ("^X", "clear"),
            ("^N", "next"),
        ],
        Stage::ImmediateReliefPractice => match state.relief_sub_stage {
            ReliefSubStage::Menu => &[("↑/↓", "select"), ("Enter", "start")],
            ReliefSubStage::PatternPuzzleRelief => &[
                ("1-4", "choose"),
                ("p", "pause"),
                ("s", "skip"),
            ],
            ReliefSubStage::AudioBreatheRelief => &[
                ("Enter", "start/pause"),
                ("c", "chime only"),
                ("Esc", "back"),
            ],
        },
        Stage::ReinforcementBecoming => &[("Enter", "begin again"), ("j", "journal")],
    }
}

fn draw_key_hints(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut spans = Vec::new();
    let global: [(&str, &str); 3] = [("^T", "theme"), ("^L", "journal"), ("^Q", "quit")];
    for (key, action) in key_hints(app).iter().chain(global.iter()) {
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_toast(frame: &mut Frame, app: &App, view: &ViewState, palette: &Palette, glyphs: &Glyphs) {
    let toast = &app.flow().state().toast;
    if !toast.visible || toast.message.is_empty() {
        return;
    }
    let area = frame.area();
    let glyph = glyphs.toast(toast.kind);
    let text_width = u16::try_from(toast.message.width() + glyph.width() + 5).unwrap_or(u16::MAX);
    let width = text_width
        .min(TOAST_MAX_WIDTH)
        .min(area.width.saturating_sub(2))
        .max(1);
    let base = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };
    let rect = apply_toast_effect(view.toast_flash(), base, area);

    let color = palette.toast(toast.kind);
    let mut text_style = Style::default().fg(palette.text_primary);
    if is_flash_peak(view.toast_flash()) {
        text_style = text_style.add_modifier(Modifier::BOLD);
    }
    let line = Line::from(vec![
        Span::styled(format!("{glyph} "), Style::default().fg(color)),
        Span::styled(toast.message.clone(), text_style),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(palette.bg_panel)),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(widget, rect);
}

fn draw_journal(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let width = JOURNAL_MAX_WIDTH.min(area.width.saturating_sub(4));
    let height = area.height.saturating_sub(4).max(3);
    let journal_area = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + 2.min(area.height),
        width,
        height: height.min(area.height),
    };
    frame.render_widget(Clear, journal_area);

    let journal = &app.flow().state().journal;
    let mut lines: Vec<Line> = Vec::new();
    if journal.is_empty() {
        lines.push(Line::from(Span::styled(
            "No anchored frames yet.",
            styles::muted(palette),
        )));
    }
    // Newest first.
    for entry in journal.iter().rev() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", glyphs.bullet), styles::key_highlight(palette)),
            Span::styled(format_timestamp(&entry.timestamp), styles::muted(palette)),
            Span::styled(
                format!("  {}", glyphs.rating_on.repeat(usize::from(entry.rating.value()))),
                styles::key_highlight(palette),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.full_text),
            styles::body(palette),
        )));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.primary))
            .title(Span::styled(
                format!(" Journal ({}) ", journal.len()),
                styles::title(palette),
            ))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(palette.bg_panel)),
    );
    frame.render_widget(widget, journal_area);
}

/// Local date and time for an RFC 3339 timestamp, or the raw text when it
/// does not parse.
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |ts| {
            ts.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        },
    )
}
