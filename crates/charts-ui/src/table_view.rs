//! Tabular sections: "Top N" rankings and summary statistics.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use charts_core::formatting;
use charts_core::models::RankingResult;
use charts_runtime::dashboard::Stat;

use crate::themes::Theme;

/// Message shown wherever a selection matches no rows.
pub const NO_DATA: &str = "No data for this selection";

/// Bordered block for a section, highlighted when it has focus.
pub(crate) fn section_block(title: &str, theme: &Theme, focused: bool) -> Block<'static> {
    let border = if focused {
        theme.section_focus
    } else {
        theme.table_border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", title))
}

/// Render a ranking as a numbered table.
///
/// The first column is the 1-based position, then the title, then one
/// right-aligned column per projected metric.
pub fn render_ranking_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    ranking: &RankingResult,
    theme: &Theme,
    focused: bool,
) {
    if ranking.is_empty() {
        render_no_data(frame, area, title, theme, focused);
        return;
    }

    let header_cells = std::iter::once("#")
        .chain(ranking.headers())
        .map(|h| Cell::from(h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = ranking
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![
                Cell::from(row.position.to_string()).style(theme.table_rank),
                Cell::from(row.title.clone()),
            ];
            cells.extend(
                row.values
                    .iter()
                    .map(|&v| Cell::from(Line::from(formatting::format_count(v)).right_aligned())),
            );
            Row::new(cells).style(theme.row_style(i))
        })
        .collect();

    let mut widths = vec![Constraint::Length(4), Constraint::Min(24)];
    widths.extend(ranking.metrics.iter().map(|_| Constraint::Length(20)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(section_block(title, theme, focused))
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render labelled statistics, one per line.
pub fn render_stats(frame: &mut Frame, area: Rect, title: &str, stats: &[Stat], theme: &Theme, focused: bool) {
    let mut lines = vec![Line::from("")];
    for stat in stats {
        lines.push(Line::from(Span::styled(stat.label.clone(), theme.label)));
        lines.push(Line::from(Span::styled(
            format!("  {}", formatting::format_average(stat.value)),
            theme.value,
        )));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(section_block(title, theme, focused)),
        area,
    );
}

/// Placeholder for a section whose selection is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme, focused: bool) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(NO_DATA, theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(section_block(title, theme, focused)),
        area,
    );
}

/// Placeholder for a section that failed to compute.
pub fn render_unavailable(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    theme: &Theme,
    focused: bool,
) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("This section could not be computed:", theme.error)),
        Line::from(Span::styled(message.to_string(), theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: true })
            .block(section_block(title, theme, focused)),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
