//! Descriptive statistics and chart series for the dashboard pages.

use charts_core::error::Result;
use charts_core::models::{Metric, Record, Table};
use serde::Serialize;

use crate::ranking::{top_n_by, SortOrder};

// ── Statistics ────────────────────────────────────────────────────────────────

/// Truncated integer mean of `metric`, or `None` for an empty table.
pub fn mean_metric<R: Record>(table: &Table<R>, metric: Metric) -> Result<Option<u64>> {
    table.require(metric.column())?;
    if table.is_empty() {
        return Ok(None);
    }
    let sum: u128 = table
        .iter()
        .map(|row| u128::from(row.metric(metric).unwrap_or(0)))
        .sum();
    // The mean of u64 values always fits back into a u64.
    Ok(Some((sum / table.len() as u128) as u64))
}

// ── Scatter ───────────────────────────────────────────────────────────────────

/// One point of a scatter plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub x: u64,
    pub y: u64,
    /// Marker size or colour value, when the plot has a third dimension.
    pub extra: Option<u64>,
    pub title: String,
}

/// Points for a two- or three-metric scatter plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterSeries {
    pub x_metric: Metric,
    pub y_metric: Metric,
    pub extra_metric: Option<Metric>,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest x and y values, for axis bounds.
    pub fn max_xy(&self) -> (u64, u64) {
        self.points
            .iter()
            .fold((0, 0), |(mx, my), p| (mx.max(p.x), my.max(p.y)))
    }

    /// Smallest and largest third-dimension value, if any point has one.
    pub fn extra_range(&self) -> Option<(u64, u64)> {
        let mut values = self.points.iter().filter_map(|p| p.extra);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Build a scatter series with one point per row, in table order.
pub fn scatter_series<R: Record>(
    table: &Table<R>,
    x: Metric,
    y: Metric,
    extra: Option<Metric>,
) -> Result<ScatterSeries> {
    table.require("title")?;
    table.require(x.column())?;
    table.require(y.column())?;
    if let Some(metric) = extra {
        table.require(metric.column())?;
    }

    let points = table
        .iter()
        .map(|row| ScatterPoint {
            x: row.metric(x).unwrap_or(0),
            y: row.metric(y).unwrap_or(0),
            extra: extra.map(|m| row.metric(m).unwrap_or(0)),
            title: row.title().to_string(),
        })
        .collect();

    Ok(ScatterSeries {
        x_metric: x,
        y_metric: y,
        extra_metric: extra,
        points,
    })
}

// ── Bars ──────────────────────────────────────────────────────────────────────

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

/// Every row of a table as a bar, sorted by one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarSeries {
    pub metric: Metric,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

/// All rows of `table` as bars ordered by `metric` (stable on ties).
pub fn bar_series<R: Record>(table: &Table<R>, metric: Metric, order: SortOrder) -> Result<BarSeries> {
    table.require("title")?;
    table.require(metric.column())?;

    let bars = top_n_by(table, |row| row.metric(metric).unwrap_or(0), table.len(), order)
        .into_iter()
        .map(|row| Bar {
            label: row.title().to_string(),
            value: row.metric(metric).unwrap_or(0),
        })
        .collect();

    Ok(BarSeries { metric, bars })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use charts_core::error::ChartsError;
    use charts_core::models::{ChannelRecord, ChannelTable};

    fn channels(rows: &[(&str, u64, u64, u64)]) -> ChannelTable {
        Table::new(
            "channels",
            ["title", "view_count", "subscriber_count", "video_count"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows.iter()
                .map(|&(title, views, subs, vids)| ChannelRecord {
                    title: title.to_string(),
                    view_count: views,
                    subscriber_count: subs,
                    video_count: vids,
                    ..Default::default()
                })
                .collect(),
        )
    }

    // ── mean_metric ───────────────────────────────────────────────────────────

    #[test]
    fn test_mean_metric_truncates() {
        let t = channels(&[("a", 10, 0, 0), ("b", 11, 0, 0)]);
        assert_eq!(mean_metric(&t, Metric::ViewCount).unwrap(), Some(10));
    }

    #[test]
    fn test_mean_metric_empty_table() {
        let t = channels(&[]);
        assert_eq!(mean_metric(&t, Metric::SubscriberCount).unwrap(), None);
    }

    #[test]
    fn test_mean_metric_no_overflow() {
        let t = channels(&[("a", u64::MAX, 0, 0), ("b", u64::MAX, 0, 0)]);
        assert_eq!(mean_metric(&t, Metric::ViewCount).unwrap(), Some(u64::MAX));
    }

    #[test]
    fn test_mean_metric_missing_column() {
        let t = channels(&[("a", 1, 1, 1)]);
        assert!(matches!(
            mean_metric(&t, Metric::LikeCount),
            Err(ChartsError::Schema { .. })
        ));
    }

    // ── scatter_series ────────────────────────────────────────────────────────

    #[test]
    fn test_scatter_series_with_extra() {
        let t = channels(&[("a", 100, 5, 3), ("b", 40, 9, 12)]);
        let series = scatter_series(
            &t,
            Metric::ViewCount,
            Metric::SubscriberCount,
            Some(Metric::VideoCount),
        )
        .unwrap();

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[1].title, "b");
        assert_eq!(series.points[1].extra, Some(12));
        assert_eq!(series.max_xy(), (100, 9));
        assert_eq!(series.extra_range(), Some((3, 12)));
    }

    #[test]
    fn test_scatter_series_without_extra() {
        let t = channels(&[("a", 1, 2, 3)]);
        let series = scatter_series(&t, Metric::ViewCount, Metric::VideoCount, None).unwrap();
        assert_eq!(series.points[0].extra, None);
        assert_eq!(series.extra_range(), None);
    }

    #[test]
    fn test_scatter_series_empty() {
        let series =
            scatter_series(&channels(&[]), Metric::ViewCount, Metric::VideoCount, None).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.max_xy(), (0, 0));
    }

    #[test]
    fn test_scatter_series_missing_title() {
        let t: ChannelTable = Table::new(
            "channels",
            vec!["view_count".to_string(), "video_count".to_string()],
            vec![ChannelRecord::default()],
        );
        assert!(matches!(
            scatter_series(&t, Metric::ViewCount, Metric::VideoCount, None),
            Err(ChartsError::Schema { ref column, .. }) if column == "title"
        ));
    }

    // ── bar_series ────────────────────────────────────────────────────────────

    #[test]
    fn test_bar_series_ascending_all_rows() {
        let t = channels(&[("a", 30, 0, 0), ("b", 10, 0, 0), ("c", 20, 0, 0)]);
        let series = bar_series(&t, Metric::ViewCount, SortOrder::Ascending).unwrap();
        let labels: Vec<&str> = series.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
        assert_eq!(series.max(), 30);
    }

    #[test]
    fn test_bar_series_empty() {
        let series = bar_series(&channels(&[]), Metric::ViewCount, SortOrder::Ascending).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.max(), 0);
    }

    #[test]
    fn test_bar_series_missing_title() {
        let t: ChannelTable = Table::new("channels", vec!["view_count".to_string()], vec![]);
        assert!(matches!(
            bar_series(&t, Metric::ViewCount, SortOrder::Descending),
            Err(ChartsError::Schema { .. })
        ));
    }
}
