//! Plain-text rendering of a page, used by `--view report`.
//!
//! The output holds the same sections as the interactive dashboard, laid out
//! as aligned text so it can be piped or saved.

use std::fmt::Write as _;
use std::io;

use unicode_width::UnicodeWidthStr;

use charts_core::formatting::{format_average, format_compact, format_count};
use charts_core::models::{CategoryCount, RankingResult};
use charts_data::analysis::{BarSeries, ScatterSeries};
use charts_runtime::dashboard::{PageView, Section, SectionContent, Stat};

use crate::chart_view::truncate_label;
use crate::components::header::Header;
use crate::table_view::NO_DATA;
use crate::themes::Theme;

/// Width of the longest text bar.
const BAR_WIDTH: usize = 40;
/// Scatter points listed under the summary line.
const SCATTER_PREVIEW: usize = 10;
/// Titles are cut to this many columns in tables and bar labels.
const TITLE_WIDTH: usize = 40;

/// Render `view` as a text report.
pub fn render_report(view: &PageView, source: &str) -> String {
    let mut out = String::new();

    let theme = Theme::classic();
    for line in Header::new(view.page.heading(), source, &theme).to_lines() {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }

    for section in &view.sections {
        render_section(&mut out, section);
        out.push('\n');
    }
    out
}

/// Write the report for `view` to `w`.
pub fn write_report(w: &mut impl io::Write, view: &PageView, source: &str) -> io::Result<()> {
    w.write_all(render_report(view, source).as_bytes())?;
    w.flush()
}

fn render_section(out: &mut String, section: &Section) {
    let _ = writeln!(out, "## {}", section.title);
    let _ = writeln!(out, "{}", "-".repeat(section.title.width() + 3));

    match &section.content {
        SectionContent::Ranking(ranking) => ranking_text(out, ranking),
        SectionContent::Stats(stats) => stats_text(out, stats),
        SectionContent::Bars(series) => bars_text(out, series),
        SectionContent::Counts {
            x_label,
            y_label,
            counts,
        } => counts_text(out, x_label, y_label, counts),
        SectionContent::Scatter(series) => scatter_text(out, series),
        SectionContent::Unavailable(message) => {
            let _ = writeln!(out, "Unavailable: {}", message);
        }
    }
}

// ── Tables ────────────────────────────────────────────────────────────────────

fn ranking_text(out: &mut String, ranking: &RankingResult) {
    if ranking.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
        return;
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(ranking.len() + 1);
    rows.push(
        std::iter::once("#")
            .chain(ranking.headers())
            .map(str::to_string)
            .collect(),
    );
    for row in &ranking.rows {
        let mut cells = vec![row.position.to_string(), truncate_label(&row.title, TITLE_WIDTH)];
        cells.extend(row.values.iter().map(|&v| format_count(v)));
        rows.push(cells);
    }

    // Title column is left-aligned, everything else right-aligned.
    let aligned = align_columns(&rows, |column| column != 1);
    for line in aligned {
        let _ = writeln!(out, "{}", line);
    }
}

fn stats_text(out: &mut String, stats: &[Stat]) {
    for stat in stats {
        let _ = writeln!(out, "{}", stat.label);
        let _ = writeln!(out, "  {}", format_average(stat.value));
    }
}

/// Pad every cell to its column's display width.
fn align_columns(rows: &[Vec<String>], right_aligned: impl Fn(usize) -> bool) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| pad(cell, widths[c], right_aligned(c)))
                .collect();
            cells.join("  ").trim_end().to_string()
        })
        .collect()
}

fn pad(cell: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    if right {
        format!("{fill}{cell}")
    } else {
        format!("{cell}{fill}")
    }
}

// ── Charts ────────────────────────────────────────────────────────────────────

fn bars_text(out: &mut String, series: &BarSeries) {
    if series.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
        return;
    }
    let _ = writeln!(out, "({})", series.metric.axis_label());
    let entries: Vec<(String, u64)> = series
        .bars
        .iter()
        .map(|b| (b.label.clone(), b.value))
        .collect();
    bar_lines(out, &entries, series.max(), format_compact);
}

fn counts_text(out: &mut String, x_label: &str, y_label: &str, counts: &[CategoryCount]) {
    if counts.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
        return;
    }
    let _ = writeln!(out, "({} / {})", x_label, y_label);
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let entries: Vec<(String, u64)> = counts.iter().map(|c| (c.label.clone(), c.count)).collect();
    bar_lines(out, &entries, max, format_count);
}

fn bar_lines(out: &mut String, entries: &[(String, u64)], max: u64, value: impl Fn(u64) -> String) {
    let labels: Vec<String> = entries
        .iter()
        .map(|(label, _)| truncate_label(label, TITLE_WIDTH))
        .collect();
    let label_width = labels.iter().map(|l| l.width()).max().unwrap_or(0);

    for (label, &(_, v)) in labels.iter().zip(entries) {
        let _ = writeln!(
            out,
            "{} {} {}",
            pad(label, label_width, false),
            bar(v, max),
            value(v)
        );
    }
}

/// A bar of `█` scaled so that `max` fills [`BAR_WIDTH`].
fn bar(value: u64, max: u64) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    format!("{:<width$}", "█".repeat(filled), width = BAR_WIDTH)
}

fn scatter_text(out: &mut String, series: &ScatterSeries) {
    if series.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
        return;
    }

    let (max_x, max_y) = series.max_xy();
    let _ = writeln!(
        out,
        "{} points; {} up to {}, {} up to {}",
        series.points.len(),
        series.x_metric.axis_label(),
        format_count(max_x),
        series.y_metric.axis_label(),
        format_count(max_y),
    );

    let mut header = vec![
        "Title".to_string(),
        series.x_metric.axis_label().to_string(),
        series.y_metric.axis_label().to_string(),
    ];
    if let Some(extra) = series.extra_metric {
        header.push(extra.axis_label().to_string());
    }
    let mut rows = vec![header];
    for point in series.points.iter().take(SCATTER_PREVIEW) {
        let mut cells = vec![
            truncate_label(&point.title, TITLE_WIDTH),
            format_count(point.x),
            format_count(point.y),
        ];
        if series.extra_metric.is_some() {
            cells.push(point.extra.map(format_count).unwrap_or_default());
        }
        rows.push(cells);
    }
    for line in align_columns(&rows, |column| column != 0) {
        let _ = writeln!(out, "{}", line);
    }
    if series.points.len() > SCATTER_PREVIEW {
        let _ = writeln!(out, "... {} more", series.points.len() - SCATTER_PREVIEW);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use charts_core::models::{Metric, RankedRow};
    use charts_data::analysis::{Bar, ScatterPoint};
    use charts_runtime::dashboard::Page;

    fn section(title: &str, content: SectionContent) -> Section {
        Section {
            title: title.to_string(),
            content,
        }
    }

    fn view(sections: Vec<Section>) -> PageView {
        PageView {
            page: Page::Videos,
            sections,
        }
    }

    // ── header ────────────────────────────────────────────────────────────────

    #[test]
    fn test_report_header() {
        let text = render_report(&view(vec![]), "video_data_2023-03-19.csv");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("INDUNDI CHARTS"));
        assert_eq!(lines[2], "[ Burundi Music Charts | video_data_2023-03-19.csv ]");
    }

    // ── tables ────────────────────────────────────────────────────────────────

    #[test]
    fn test_ranking_columns_aligned() {
        let ranking = RankingResult {
            metrics: vec![Metric::ViewCount],
            rows: vec![
                RankedRow {
                    position: 1,
                    title: "Amarira".to_string(),
                    values: vec![1_234_567],
                },
                RankedRow {
                    position: 2,
                    title: "KURE".to_string(),
                    values: vec![89],
                },
            ],
        };
        let text = render_report(&view(vec![section("Top", SectionContent::Ranking(ranking))]), "");
        assert!(text.contains("## Top"));
        assert!(text.contains("#  Title    Number of views"));
        assert!(text.contains("1  Amarira        1,234,567"));
        assert!(text.contains("2  KURE                  89"));
    }

    #[test]
    fn test_empty_ranking_and_unavailable() {
        let text = render_report(
            &view(vec![
                section(
                    "Top",
                    SectionContent::Ranking(RankingResult {
                        metrics: vec![Metric::ViewCount],
                        rows: vec![],
                    }),
                ),
                section("Tags", SectionContent::Unavailable("no column 'tags'".to_string())),
            ]),
            "",
        );
        assert!(text.contains(NO_DATA));
        assert!(text.contains("Unavailable: no column 'tags'"));
    }

    #[test]
    fn test_stats_text() {
        let stats = vec![Stat {
            label: "What is the average number of views per channel?".to_string(),
            value: None,
        }];
        let text = render_report(&view(vec![section("Averages", SectionContent::Stats(stats))]), "");
        assert!(text.contains("What is the average number of views per channel?\n  n/a"));
    }

    #[test]
    fn test_align_columns_wide_chars() {
        let rows = vec![
            vec!["歌".to_string(), "1".to_string()],
            vec!["ab".to_string(), "22".to_string()],
        ];
        let lines = align_columns(&rows, |c| c == 1);
        assert_eq!(lines, vec!["歌   1", "ab  22"]);
    }

    // ── charts ────────────────────────────────────────────────────────────────

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10, 10).trim_end().chars().count(), BAR_WIDTH);
        assert_eq!(bar(5, 10).trim_end().chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0, 0).trim_end(), "");
    }

    #[test]
    fn test_bars_and_counts_text() {
        let series = BarSeries {
            metric: Metric::SubscriberCount,
            bars: vec![Bar {
                label: "Sat-B".to_string(),
                value: 12_345,
            }],
        };
        let counts = vec![CategoryCount::new("Pop", 3), CategoryCount::new("HipHop", 1)];
        let text = render_report(
            &view(vec![
                section("Bars", SectionContent::Bars(series)),
                section(
                    "Categories",
                    SectionContent::Counts {
                        x_label: "Category",
                        y_label: "Number of Videos",
                        counts,
                    },
                ),
            ]),
            "",
        );
        assert!(text.contains("(Subscriber Count)"));
        assert!(text.contains("12.3K"));
        assert!(text.contains("(Category / Number of Videos)"));
        let pop = text.lines().find(|l| l.starts_with("Pop")).unwrap();
        assert!(pop.ends_with(" 3"), "line = {pop:?}");
        assert!(!text.contains('%'), "counts carry no share of a partial total");
    }

    #[test]
    fn test_scatter_text_truncates_points() {
        let points = (0..15u64)
            .map(|i| ScatterPoint {
                x: i * 1_000,
                y: i,
                extra: Some(i),
                title: format!("v{i}"),
            })
            .collect();
        let series = ScatterSeries {
            x_metric: Metric::ViewCount,
            y_metric: Metric::LikeCount,
            extra_metric: Some(Metric::CommentCount),
            points,
        };
        let text = render_report(&view(vec![section("Engagement", SectionContent::Scatter(series))]), "");
        assert!(text.contains("15 points; View Count up to 14,000, Like Count up to 14"));
        assert!(text.contains("Comment Count"));
        assert!(text.contains("... 5 more"));
        assert!(!text.contains("v12"));
    }

    #[test]
    fn test_write_report() {
        let mut buf = Vec::new();
        write_report(&mut buf, &view(vec![]), "src").unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("INDUNDI CHARTS"));
    }
}
