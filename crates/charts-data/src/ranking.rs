//! "Top N" rankings over channel and video tables.

use std::cmp::Ordering;

use charts_core::error::Result;
use charts_core::models::{Metric, RankedRow, RankingResult, Record, Table};
use tracing::debug;

/// Columns summed by [`RankKey::Composite`].
pub const COMPOSITE_METRICS: [Metric; 3] =
    [Metric::ViewCount, Metric::LikeCount, Metric::CommentCount];

/// Direction of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest value first.
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Descending => ordering.reverse(),
            SortOrder::Ascending => ordering,
        }
    }
}

/// What rows are ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankKey {
    /// One or more columns, compared lexicographically in declared order.
    Columns(Vec<Metric>),
    /// `view_count + like_count + comment_count`.
    Composite,
}

impl RankKey {
    /// Shorthand for a single-column key.
    pub fn column(metric: Metric) -> Self {
        RankKey::Columns(vec![metric])
    }

    /// Every column the key reads.
    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            RankKey::Columns(metrics) => metrics.clone(),
            RankKey::Composite => COMPOSITE_METRICS.to_vec(),
        }
    }

    /// The sort key of `row`.
    fn key_of<R: Record>(&self, row: &R) -> Vec<u64> {
        match self {
            RankKey::Columns(metrics) => metrics
                .iter()
                .map(|&m| row.metric(m).unwrap_or(0))
                .collect(),
            RankKey::Composite => vec![composite_score(row)],
        }
    }
}

/// Unweighted engagement score of any record, saturating on overflow.
pub fn composite_score<R: Record>(row: &R) -> u64 {
    COMPOSITE_METRICS
        .iter()
        .map(|&m| row.metric(m).unwrap_or(0))
        .fold(0u64, u64::saturating_add)
}

/// Stable top-N selection.
///
/// Rows with equal keys keep their input order. Returns at most `n` rows.
pub fn top_n_by<'a, R, K, F>(
    rows: impl IntoIterator<Item = &'a R>,
    key: F,
    n: usize,
    order: SortOrder,
) -> Vec<&'a R>
where
    R: 'a,
    K: Ord,
    F: Fn(&R) -> K,
{
    if n == 0 {
        return Vec::new();
    }

    let mut keyed: Vec<(K, &'a R)> = rows.into_iter().map(|row| (key(row), row)).collect();
    // `sort_by` is stable, so ties stay in input order in both directions.
    keyed.sort_by(|a, b| order.apply(a.0.cmp(&b.0)));
    keyed.truncate(n);
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Rank `table` by `key` and keep the first `n` rows, projected to
/// `projection`.
///
/// Every column read by the key or the projection must be present in the
/// table's schema. An empty table yields an empty result.
pub fn rank<R: Record>(
    table: &Table<R>,
    key: &RankKey,
    n: usize,
    order: SortOrder,
    projection: &[Metric],
) -> Result<RankingResult> {
    table.require("title")?;
    table.require_metrics(&key.metrics())?;
    table.require_metrics(projection)?;

    let top = top_n_by(table, |row| key.key_of(row), n, order);

    let rows: Vec<RankedRow> = top
        .into_iter()
        .enumerate()
        .map(|(index, row)| RankedRow {
            position: index + 1,
            title: row.title().to_string(),
            values: projection
                .iter()
                .map(|&m| row.metric(m).unwrap_or(0))
                .collect(),
        })
        .collect();

    debug!(
        "Ranked {} of {} {} rows by {:?}",
        rows.len(),
        table.len(),
        table.name(),
        key
    );

    Ok(RankingResult {
        metrics: projection.to_vec(),
        rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
