//! Chart sections: bar charts and scatter plots.

use ratatui::{
    layout::{Direction, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType},
    Frame,
};

use charts_core::formatting::format_compact;
use charts_core::models::CategoryCount;
use charts_data::analysis::{BarSeries, ScatterSeries};

use crate::table_view::{render_no_data, section_block};
use crate::themes::Theme;

/// Bar chart labels are cut to this many columns.
const LABEL_WIDTH: usize = 28;

// ── Bars ──────────────────────────────────────────────────────────────────────

/// Horizontal bars, one per row of `series`.
pub fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &BarSeries,
    theme: &Theme,
    focused: bool,
) {
    if series.is_empty() {
        render_no_data(frame, area, title, theme, focused);
        return;
    }

    let entries: Vec<(&str, u64)> = series
        .bars
        .iter()
        .map(|b| (b.label.as_str(), b.value))
        .collect();
    let title = format!("{} ({})", title, series.metric.axis_label());
    render_bars(frame, area, &title, &entries, theme, focused);
}

/// Horizontal bars for a frequency table.
#[allow(clippy::too_many_arguments)]
pub fn render_count_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    x_label: &str,
    y_label: &str,
    counts: &[CategoryCount],
    theme: &Theme,
    focused: bool,
) {
    if counts.is_empty() {
        render_no_data(frame, area, title, theme, focused);
        return;
    }

    let entries: Vec<(&str, u64)> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
    let title = format!("{} ({} / {})", title, x_label, y_label);
    render_bars(frame, area, &title, &entries, theme, focused);
}

fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[(&str, u64)],
    theme: &Theme,
    focused: bool,
) {
    let bars: Vec<Bar> = entries
        .iter()
        .map(|&(label, value)| {
            Bar::default()
                .label(Line::from(truncate_label(label, LABEL_WIDTH)))
                .value(value)
                .text_value(format_compact(value))
                .style(theme.bar)
                .value_style(theme.bar_value)
        })
        .collect();

    let chart = BarChart::default()
        .block(section_block(title, theme, focused))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Cut `label` to at most `width` characters, marking the cut with `…`.
pub fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let kept: String = label.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

// ── Scatter ───────────────────────────────────────────────────────────────────

/// Scatter plot of `series`.
///
/// When the series has a third metric, points are coloured low / medium /
/// high by where that value falls in its range.
pub fn render_scatter(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &ScatterSeries,
    theme: &Theme,
    focused: bool,
) {
    if series.is_empty() {
        render_no_data(frame, area, title, theme, focused);
        return;
    }

    let buckets = scatter_buckets(series);
    let (max_x, max_y) = series.max_xy();
    let (x_bound, y_bound) = (axis_bound(max_x), axis_bound(max_y));

    let datasets: Vec<Dataset> = match series.extra_metric {
        Some(metric) => {
            let styles = [0.0, 0.5, 1.0].map(|f| theme.scale_style(f));
            let names = ["low", "medium", "high"];
            buckets
                .iter()
                .zip(styles)
                .zip(names)
                .filter(|((points, _), _)| !points.is_empty())
                .map(|((points, style), name)| {
                    Dataset::default()
                        .name(format!("{} {}", name, metric.axis_label()))
                        .marker(symbols::Marker::Dot)
                        .graph_type(GraphType::Scatter)
                        .style(style)
                        .data(points)
                })
                .collect()
        }
        None => vec![Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(theme.bar)
            .data(&buckets[0])],
    };

    let chart = Chart::new(datasets)
        .block(section_block(title, theme, focused))
        .x_axis(
            Axis::default()
                .title(series.x_metric.axis_label())
                .style(theme.axis)
                .bounds([0.0, x_bound])
                .labels(axis_labels(x_bound)),
        )
        .y_axis(
            Axis::default()
                .title(series.y_metric.axis_label())
                .style(theme.axis)
                .bounds([0.0, y_bound])
                .labels(axis_labels(y_bound)),
        );

    frame.render_widget(chart, area);
}

/// Split points into low/medium/high thirds of the third metric's range.
///
/// Without a third metric every point lands in the first bucket.
pub fn scatter_buckets(series: &ScatterSeries) -> [Vec<(f64, f64)>; 3] {
    let mut buckets: [Vec<(f64, f64)>; 3] = Default::default();
    let range = series.extra_range();

    for point in &series.points {
        let xy = (point.x as f64, point.y as f64);
        let bucket = match (point.extra, range) {
            (Some(v), Some((lo, hi))) if hi > lo => {
                let fraction = (v - lo) as f64 / (hi - lo) as f64;
                ((fraction * 3.0) as usize).min(2)
            }
            _ => 0,
        };
        buckets[bucket].push(xy);
    }
    buckets
}

/// Upper axis bound: the maximum, or 1 when everything is zero.
fn axis_bound(max: u64) -> f64 {
    if max == 0 {
        1.0
    } else {
        max as f64
    }
}

/// Three axis tick labels: zero, midpoint and maximum.
fn axis_labels(bound: f64) -> Vec<Span<'static>> {
    [0.0, bound / 2.0, bound]
        .iter()
        .map(|&v| Span::raw(format_compact(v.round() as u64)))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use charts_core::models::Metric;
    use charts_data::analysis::{Bar as SeriesBar, ScatterPoint};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn point(x: u64, y: u64, extra: Option<u64>) -> ScatterPoint {
        ScatterPoint {
            x,
            y,
            extra,
            title: format!("p{x}"),
        }
    }

    fn series(points: Vec<ScatterPoint>, extra: Option<Metric>) -> ScatterSeries {
        ScatterSeries {
            x_metric: Metric::ViewCount,
            y_metric: Metric::LikeCount,
            extra_metric: extra,
            points,
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("KURE", 10), "KURE");
        assert_eq!(truncate_label("Narahezagiwe ft B face", 8), "Narahez…");
    }

    #[test]
    fn test_scatter_buckets_by_extra() {
        let s = series(
            vec![
                point(1, 1, Some(0)),
                point(2, 2, Some(50)),
                point(3, 3, Some(100)),
            ],
            Some(Metric::CommentCount),
        );
        let buckets = scatter_buckets(&s);
        assert_eq!(buckets[0], vec![(1.0, 1.0)]);
        assert_eq!(buckets[1], vec![(2.0, 2.0)]);
        assert_eq!(buckets[2], vec![(3.0, 3.0)]);
    }

    #[test]
    fn test_scatter_buckets_flat_range() {
        let s = series(
            vec![point(1, 1, Some(7)), point(2, 2, Some(7))],
            Some(Metric::CommentCount),
        );
        assert_eq!(scatter_buckets(&s)[0].len(), 2);
    }

    #[test]
    fn test_axis_labels() {
        let labels: Vec<String> = axis_labels(2_000_000.0)
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect();
        assert_eq!(labels, vec!["0", "1.0M", "2.0M"]);
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_bar_chart() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let bars = BarSeries {
            metric: Metric::ViewCount,
            bars: vec![
                SeriesBar {
                    label: "Sat-B".to_string(),
                    value: 900_000,
                },
                SeriesBar {
                    label: "Drama T".to_string(),
                    value: 1_500_000,
                },
            ],
        };
        terminal
            .draw(|f| render_bar_chart(f, f.area(), "Channels", &bars, &theme, true))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Drama T"));
        assert!(text.contains("View Count"));
    }

    #[test]
    fn test_render_count_chart_empty() {
        let backend = TestBackend::new(60, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        terminal
            .draw(|f| {
                render_count_chart(f, f.area(), "Tags", "Tag", "Count", &[], &theme, false)
            })
            .unwrap();
        assert!(screen_text(&terminal).contains("No data"));
    }

    #[test]
    fn test_render_scatter_does_not_panic() {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::classic();
        let with_extra = series(
            vec![point(10, 5, Some(1)), point(400, 90, Some(30))],
            Some(Metric::CommentCount),
        );
        let plain = series(vec![point(0, 0, None)], None);
        terminal
            .draw(|f| {
                let area = f.area();
                render_scatter(f, area, "Audience Engagement", &with_extra, &theme, true);
                render_scatter(f, area, "Zeros", &plain, &theme, false);
            })
            .unwrap();
    }
}
