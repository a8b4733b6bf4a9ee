use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// All styles used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,
    pub error: Style,

    // ── Navigation ───────────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
    /// Border of the section that has focus.
    pub section_focus: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_rank: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub axis: Style,
    pub bar: Style,
    pub bar_value: Style,
    /// Scatter markers in the lowest third of the colour scale.
    pub scale_low: Style,
    pub scale_medium: Style,
    pub scale_high: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            section_focus: Style::default().fg(Color::Cyan),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_rank: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::Gray),
            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default().fg(Color::Black).bg(Color::Cyan),
            scale_low: Style::default().fg(Color::Blue),
            scale_medium: Style::default().fg(Color::Magenta),
            scale_high: Style::default().fg(Color::Yellow),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            section_focus: Style::default().fg(Color::Blue),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_rank: Style::default().fg(Color::Magenta),

            axis: Style::default().fg(Color::DarkGray),
            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),
            scale_low: Style::default().fg(Color::Blue),
            scale_medium: Style::default().fg(Color::Magenta),
            scale_high: Style::default().fg(Color::Red),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            error: Style::default().fg(Color::Red),

            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::Gray),
            section_focus: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_rank: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::White),
            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            scale_low: Style::default().fg(Color::Green),
            scale_medium: Style::default().fg(Color::Yellow),
            scale_high: Style::default().fg(Color::Red),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour-scale style for a value at `fraction` (0.0–1.0) of its range.
    ///
    /// * `< 1/3`   → `scale_low`
    /// * `1/3–2/3` → `scale_medium`
    /// * `≥ 2/3`   → `scale_high`
    pub fn scale_style(&self, fraction: f64) -> Style {
        if fraction >= 2.0 / 3.0 {
            self.scale_high
        } else if fraction >= 1.0 / 3.0 {
            self.scale_medium
        } else {
            self.scale_low
        }
    }

    /// Alternating row style for tables.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
