use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header, four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Page heading and data source in `[ heading | source ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Heading of the page on screen.
    pub heading: &'a str,
    /// Short description of the loaded snapshots, e.g. the file date.
    pub source: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(heading: &'a str, source: &'a str, theme: &'a Theme) -> Self {
        Self {
            heading,
            source,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" INDUNDI CHARTS ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.heading, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.source, self.theme.dim),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
