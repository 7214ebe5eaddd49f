//! Color theme and glyphs for the Reframe TUI.
//!
//! Kanagawa Wave for the dark theme and Kanagawa Lotus for the light theme,
//! with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use reframe_engine::{Shape, Theme, ToastKind};
use reframe_types::ui::UiOptions;

/// Kanagawa Wave color palette constants.
mod wave {
    use super::Color;

    pub const BG: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const ACCENT: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
    pub const BLUE: Color = Color::Rgb(126, 156, 216); // crystalBlue
}

/// Kanagawa Lotus color palette constants.
mod lotus {
    use super::Color;

    pub const BG: Color = Color::Rgb(242, 236, 188); // lotusWhite3
    pub const BG_PANEL: Color = Color::Rgb(231, 219, 160); // lotusWhite4
    pub const BG_HIGHLIGHT: Color = Color::Rgb(220, 213, 172); // lotusWhite5
    pub const BORDER: Color = Color::Rgb(160, 154, 190); // lotusViolet1

    pub const TEXT_PRIMARY: Color = Color::Rgb(84, 84, 100); // lotusInk1
    pub const TEXT_SECONDARY: Color = Color::Rgb(67, 67, 108); // lotusInk2
    pub const TEXT_MUTED: Color = Color::Rgb(138, 137, 128); // lotusGray3

    pub const PRIMARY: Color = Color::Rgb(98, 76, 131); // lotusViolet4
    pub const ACCENT: Color = Color::Rgb(77, 105, 155); // lotusBlue4
    pub const GREEN: Color = Color::Rgb(111, 137, 78); // lotusGreen
    pub const YELLOW: Color = Color::Rgb(119, 113, 63); // lotusYellow
    pub const ORANGE: Color = Color::Rgb(204, 109, 0); // lotusOrange
    pub const RED: Color = Color::Rgb(200, 64, 83); // lotusRed
    pub const BLUE: Color = Color::Rgb(77, 105, 155); // lotusBlue4
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn dark() -> Self {
        Self {
            bg: wave::BG,
            bg_panel: wave::BG_PANEL,
            bg_highlight: wave::BG_HIGHLIGHT,
            border: wave::BORDER,
            text_primary: wave::TEXT_PRIMARY,
            text_secondary: wave::TEXT_SECONDARY,
            text_muted: wave::TEXT_MUTED,
            primary: wave::PRIMARY,
            accent: wave::ACCENT,
            success: wave::GREEN,
            warning: wave::YELLOW,
            error: wave::RED,
            info: wave::BLUE,
            peach: wave::ORANGE,
        }
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            bg: lotus::BG,
            bg_panel: lotus::BG_PANEL,
            bg_highlight: lotus::BG_HIGHLIGHT,
            border: lotus::BORDER,
            text_primary: lotus::TEXT_PRIMARY,
            text_secondary: lotus::TEXT_SECONDARY,
            text_muted: lotus::TEXT_MUTED,
            primary: lotus::PRIMARY,
            accent: lotus::ACCENT,
            success: lotus::GREEN,
            warning: lotus::YELLOW,
            error: lotus::RED,
            info: lotus::BLUE,
            peach: lotus::ORANGE,
        }
    }

    #[must_use]
    pub fn high_contrast(theme: Theme) -> Self {
        let (bg, fg) = match theme {
            Theme::Dark => (Color::Black, Color::White),
            Theme::Light => (Color::White, Color::Black),
        };
        Self {
            bg,
            bg_panel: bg,
            bg_highlight: Color::DarkGray,
            border: Color::Gray,
            text_primary: fg,
            text_secondary: fg,
            text_muted: Color::Gray,
            primary: fg,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,
            peach: Color::Yellow,
        }
    }

    #[must_use]
    pub fn toast(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success,
            ToastKind::Error => self.error,
            ToastKind::Info => self.info,
            ToastKind::Warning => self.warning,
        }
    }
}

#[must_use]
pub fn palette(theme: Theme, options: UiOptions) -> Palette {
    if options.high_contrast {
        return Palette::high_contrast(theme);
    }
    match theme {
        Theme::Dark => Palette::dark(),
        Theme::Light => Palette::light(),
    }
}

/// ASCII/Unicode glyphs for shapes and markers.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub circle: &'static str,
    pub square: &'static str,
    pub triangle: &'static str,
    pub star: &'static str,
    pub hexagon: &'static str,
    pub cross: &'static str,
    pub empty_cell: &'static str,
    pub blank_cell: &'static str,
    pub pad_off: &'static str,
    pub pad_on: &'static str,
    pub selected: &'static str,
    pub bullet: &'static str,
    pub rating_on: &'static str,
    pub rating_off: &'static str,
    pub toast_success: &'static str,
    pub toast_error: &'static str,
    pub toast_info: &'static str,
    pub toast_warning: &'static str,
    pub paused: &'static str,
    pub running: &'static str,
    pub recording: &'static str,
    pub cursor: &'static str,
}

impl Glyphs {
    #[must_use]
    pub fn shape(&self, shape: Shape) -> &'static str {
        match shape {
            Shape::Circle => self.circle,
            Shape::Square => self.square,
            Shape::Triangle => self.triangle,
            Shape::Star => self.star,
            Shape::Hexagon => self.hexagon,
            Shape::Cross => self.cross,
        }
    }

    #[must_use]
    pub fn toast(&self, kind: ToastKind) -> &'static str {
        match kind {
            ToastKind::Success => self.toast_success,
            ToastKind::Error => self.toast_error,
            ToastKind::Info => self.toast_info,
            ToastKind::Warning => self.toast_warning,
        }
    }
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            circle: "O",
            square: "#",
            triangle: "^",
            star: "*",
            hexagon: "H",
            cross: "+",
            empty_cell: "?",
            blank_cell: ".",
            pad_off: "[ ]",
            pad_on: "[#]",
            selected: ">",
            bullet: "*",
            rating_on: "*",
            rating_off: ".",
            toast_success: "OK",
            toast_error: "ERR",
            toast_info: "i",
            toast_warning: "!",
            paused: "||",
            running: ">",
            recording: "REC",
            cursor: "_",
        }
    } else {
        Glyphs {
            circle: "●",
            square: "■",
            triangle: "▲",
            star: "★",
            hexagon: "⬢",
            cross: "✚",
            empty_cell: "?",
            blank_cell: "·",
            pad_off: "□",
            pad_on: "■",
            selected: "▸",
            bullet: "•",
            rating_on: "★",
            rating_off: "☆",
            toast_success: "✓",
            toast_error: "✗",
            toast_info: "ℹ",
            toast_warning: "⚠",
            paused: "⏸",
            running: "▶",
            recording: "●",
            cursor: "▏",
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary)
    }

    #[must_use]
    pub fn muted(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn focused(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .bg(palette.bg_highlight)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn lit(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}
