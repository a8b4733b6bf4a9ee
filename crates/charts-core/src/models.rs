use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChartsError, Result};
use crate::time_utils;

// ── Metric ────────────────────────────────────────────────────────────────────

/// A numeric column that tables can be ranked, averaged or plotted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    ViewCount,
    LikeCount,
    CommentCount,
    SubscriberCount,
    VideoCount,
}

impl Metric {
    /// Column name in the CSV snapshot.
    pub const fn column(self) -> &'static str {
        match self {
            Metric::ViewCount => "view_count",
            Metric::LikeCount => "like_count",
            Metric::CommentCount => "comment_count",
            Metric::SubscriberCount => "subscriber_count",
            Metric::VideoCount => "video_count",
        }
    }

    /// Header used in ranking tables, e.g. `"Number of views"`.
    pub const fn display_name(self) -> &'static str {
        match self {
            Metric::ViewCount => "Number of views",
            Metric::LikeCount => "Number of likes",
            Metric::CommentCount => "Number of comments",
            Metric::SubscriberCount => "Number of subscribers",
            Metric::VideoCount => "Number of videos",
        }
    }

    /// Chart axis label, e.g. `"View Count"`.
    pub const fn axis_label(self) -> &'static str {
        match self {
            Metric::ViewCount => "View Count",
            Metric::LikeCount => "Like Count",
            Metric::CommentCount => "Comment Count",
            Metric::SubscriberCount => "Subscriber Count",
            Metric::VideoCount => "Videos Uploaded",
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// Common view over a channel or video row.
pub trait Record {
    /// Display title of the row.
    fn title(&self) -> &str;

    /// Value of `metric`, or `None` when this record kind has no such column.
    fn metric(&self, metric: Metric) -> Option<u64>;

    /// 1-based data row number in the source snapshot (header excluded).
    fn row_number(&self) -> usize;
}

/// One row of the channels snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub subscriber_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub video_count: u64,
    #[serde(default)]
    pub channel_id: String,
    #[serde(skip)]
    pub row_number: usize,
}

impl Record for ChannelRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn metric(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::ViewCount => Some(self.view_count),
            Metric::SubscriberCount => Some(self.subscriber_count),
            Metric::VideoCount => Some(self.video_count),
            Metric::LikeCount | Metric::CommentCount => None,
        }
    }

    fn row_number(&self) -> usize {
        self.row_number
    }
}

/// One row of the videos snapshot.
///
/// `published_at` and `categories` are kept as raw text; use
/// [`VideoRecord::published`] and [`VideoRecord::categories`] to interpret
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: u64,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(skip)]
    pub row_number: usize,
}

impl VideoRecord {
    /// Parse `published_at` into a UTC timestamp.
    pub fn published(&self) -> Result<DateTime<Utc>> {
        time_utils::parse_timestamp(&self.published_at).ok_or_else(|| {
            ChartsError::TimestampParse {
                row: self.row_number,
                value: self.published_at.clone(),
            }
        })
    }

    /// Category labels of this video, in cell order.
    pub fn categories(&self) -> Vec<String> {
        parse_list_cell(&self.categories)
            .into_iter()
            .map(|raw| category_label(&raw))
            .filter(|label| !label.is_empty())
            .collect()
    }
}

impl Record for VideoRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn metric(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::ViewCount => Some(self.view_count),
            Metric::LikeCount => Some(self.like_count),
            Metric::CommentCount => Some(self.comment_count),
            Metric::SubscriberCount | Metric::VideoCount => None,
        }
    }

    fn row_number(&self) -> usize {
        self.row_number
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// An immutable, ordered set of records sharing one schema.
///
/// `columns` lists the columns the source snapshot actually carried, so a
/// view that needs an absent column fails with [`ChartsError::Schema`] at the
/// point of use.
#[derive(Debug, Clone)]
pub struct Table<R> {
    name: String,
    columns: Vec<String>,
    rows: Vec<R>,
}

pub type ChannelTable = Table<ChannelRecord>;
pub type VideoTable = Table<VideoRecord>;

impl<R> Table<R> {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<R>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with [`ChartsError::Schema`] unless `column` is present.
    pub fn require(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(ChartsError::missing_column(&self.name, column))
        }
    }

    /// [`Table::require`] for every metric in `metrics`.
    pub fn require_metrics(&self, metrics: &[Metric]) -> Result<()> {
        metrics.iter().try_for_each(|m| self.require(m.column()))
    }

    /// A new table with this table's name and schema but different rows.
    pub fn derive(&self, rows: Vec<R>) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

impl<R: Clone> Table<R> {
    /// Keep the rows for which `keep` returns `Ok(true)`, in order.
    ///
    /// Stops at the first error.
    pub fn try_filter(&self, mut keep: impl FnMut(&R) -> Result<bool>) -> Result<Self> {
        let mut rows = Vec::new();
        for row in &self.rows {
            if keep(row)? {
                rows.push(row.clone());
            }
        }
        Ok(self.derive(rows))
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// One line of a "Top N" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRow {
    /// 1-based position in the ranking.
    pub position: usize,
    pub title: String,
    /// Values of the projected metrics, same order as [`RankingResult::metrics`].
    pub values: Vec<u64>,
}

/// A "Top N" table ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingResult {
    pub metrics: Vec<Metric>,
    pub rows: Vec<RankedRow>,
}

impl RankingResult {
    /// Column headers: `"Title"` followed by each metric's display name.
    pub fn headers(&self) -> Vec<&'static str> {
        std::iter::once("Title")
            .chain(self.metrics.iter().map(|m| m.display_name()))
            .collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Frequency of one category label (or tag word).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

// ── Cell parsing ──────────────────────────────────────────────────────────────

/// Parse a count cell. Blank cells count as zero; `"1234.0"` (what pandas
/// writes for a column that once held NaN) is accepted as `1234`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return Some(value);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
}

fn de_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_count(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid count {raw:?}")))
}

fn quoted_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("valid quoted-item regex"))
}

/// Split a list-valued cell into its items.
///
/// Accepts list literals (`['a', 'b']`, `["a", "b"]`, `[a, b]`) and a single
/// bare value. Empty cells and empty lists yield no items.
pub fn parse_list_cell(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    };

    let re = quoted_item_re();
    if re.is_match(inner) {
        re.captures_iter(inner)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        inner
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Human-readable label for a category value.
///
/// Wikipedia topic URLs such as `https://en.wikipedia.org/wiki/Pop_music`
/// become their article title (`Pop music`); anything else is trimmed.
pub fn category_label(raw: &str) -> String {
    let raw = raw.trim();
    match raw.rsplit_once("/wiki/") {
        Some((_, article)) => article.replace('_', " "),
        None => raw.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_video(published_at: &str, categories: &str) -> VideoRecord {
        VideoRecord {
            title: "Amarira".to_string(),
            view_count: 100,
            like_count: 10,
            comment_count: 1,
            published_at: published_at.to_string(),
            categories: categories.to_string(),
            row_number: 4,
            ..Default::default()
        }
    }

    // ── Metric ────────────────────────────────────────────────────────────────

    #[test]
    fn test_metric_column_names() {
        assert_eq!(Metric::ViewCount.column(), "view_count");
        assert_eq!(Metric::SubscriberCount.column(), "subscriber_count");
        assert_eq!(Metric::CommentCount.column(), "comment_count");
    }

    #[test]
    fn test_metric_display_names() {
        assert_eq!(Metric::ViewCount.display_name(), "Number of views");
        assert_eq!(Metric::LikeCount.display_name(), "Number of likes");
        assert_eq!(Metric::VideoCount.axis_label(), "Videos Uploaded");
    }

    // ── Record ────────────────────────────────────────────────────────────────

    #[test]
    fn test_channel_metric_lookup() {
        let channel = ChannelRecord {
            title: "Drama T".to_string(),
            view_count: 5,
            subscriber_count: 6,
            video_count: 7,
            ..Default::default()
        };
        assert_eq!(channel.metric(Metric::SubscriberCount), Some(6));
        assert_eq!(channel.metric(Metric::LikeCount), None);
    }

    #[test]
    fn test_video_published_parses_rfc3339() {
        let video = make_video("2023-03-10T15:00:10Z", "");
        let ts = video.published().unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-03-10T15:00:10+00:00");
    }

    #[test]
    fn test_video_published_reports_row() {
        let video = make_video("not a date", "");
        match video.published() {
            Err(ChartsError::TimestampParse { row, value }) => {
                assert_eq!(row, 4);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected TimestampParse, got {other:?}"),
        }
    }

    #[test]
    fn test_video_categories_from_wikipedia_urls() {
        let video = make_video(
            "",
            "['https://en.wikipedia.org/wiki/Music', 'https://en.wikipedia.org/wiki/Pop_music']",
        );
        assert_eq!(video.categories(), vec!["Music", "Pop music"]);
    }

    // ── Table ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_table_require_missing_column() {
        let table: ChannelTable = Table::new("channels", vec!["title".to_string()], vec![]);
        assert!(table.require("title").is_ok());
        let err = table.require_metrics(&[Metric::ViewCount]).unwrap_err();
        assert_eq!(err.to_string(), "Table 'channels' has no column 'view_count'");
    }

    #[test]
    fn test_table_try_filter_keeps_source_intact() {
        let rows = vec![
            make_video("2023-01-01T00:00:00Z", ""),
            make_video("2022-01-01T00:00:00Z", ""),
        ];
        let table = Table::new("videos", vec!["published_at".to_string()], rows);
        let derived = table
            .try_filter(|v| Ok(v.published_at.starts_with("2023")))
            .unwrap();
        assert_eq!(derived.len(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(derived.columns(), table.columns());
    }

    #[test]
    fn test_table_try_filter_propagates_error() {
        let table = Table::new("videos", vec![], vec![make_video("x", "")]);
        let result = table.try_filter(|v| v.published().map(|_| true));
        assert!(matches!(result, Err(ChartsError::TimestampParse { .. })));
    }

    // ── RankingResult ─────────────────────────────────────────────────────────

    #[test]
    fn test_ranking_result_headers() {
        let result = RankingResult {
            metrics: vec![Metric::ViewCount, Metric::LikeCount],
            rows: vec![],
        };
        assert_eq!(
            result.headers(),
            vec!["Title", "Number of views", "Number of likes"]
        );
        assert!(result.is_empty());
    }

    // ── parse_list_cell ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_list_cell_single_quotes() {
        assert_eq!(parse_list_cell("['Pop', 'HipHop']"), vec!["Pop", "HipHop"]);
    }

    #[test]
    fn test_parse_list_cell_double_quotes() {
        assert_eq!(parse_list_cell(r#"["Pop", "Afrobeats"]"#), vec!["Pop", "Afrobeats"]);
    }

    #[test]
    fn test_parse_list_cell_unquoted_list() {
        assert_eq!(parse_list_cell("[Pop, HipHop]"), vec!["Pop", "HipHop"]);
    }

    #[test]
    fn test_parse_list_cell_bare_value() {
        assert_eq!(parse_list_cell(" Pop "), vec!["Pop"]);
    }

    #[test]
    fn test_parse_list_cell_empty() {
        assert!(parse_list_cell("").is_empty());
        assert!(parse_list_cell("[]").is_empty());
        assert!(parse_list_cell("  ").is_empty());
    }

    // ── parse_count ───────────────────────────────────────────────────────────

    #[test]
    fn test_parse_count_variants() {
        assert_eq!(parse_count("1234"), Some(1234));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("1234.0"), Some(1234));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("lots"), None);
    }

    // ── category_label ────────────────────────────────────────────────────────

    #[test]
    fn test_category_label_plain() {
        assert_eq!(category_label(" Afrobeats "), "Afrobeats");
    }

    #[test]
    fn test_category_label_wikipedia() {
        assert_eq!(
            category_label("https://en.wikipedia.org/wiki/Hip_hop_music"),
            "Hip hop music"
        );
    }
}
