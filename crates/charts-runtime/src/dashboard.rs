//! Page assembly for the dashboard.
//!
//! A page is rebuilt from the resident tables every time it is shown. Each
//! section is computed independently: a section that cannot be built (a
//! missing column, a bad timestamp) is reported in place while the rest of
//! the page still renders.

use chrono::{DateTime, Utc};
use charts_core::error::{ChartsError, Result};
use charts_core::models::{
    CategoryCount, ChannelTable, Metric, RankingResult, VideoTable,
};
use charts_data::aggregator::{top_categories, top_tags};
use charts_data::analysis::{bar_series, mean_metric, scatter_series, BarSeries, ScatterSeries};
use charts_data::ranking::{rank, top_n_by, RankKey, SortOrder};
use charts_data::time_window::{available_years, filter_month_window, filter_year};
use tracing::{debug, warn};

use crate::data_manager::DataManager;

/// Rows in every "Top N" table.
pub const TOP_N: usize = 10;
/// Videos plotted in the views-vs-likes scatter.
pub const SCATTER_TOP_VIDEOS: usize = 100;
/// Categories in the distribution chart.
pub const TOP_CATEGORIES: usize = 5;
/// Words in the tag frequency chart.
pub const TOP_TAGS: usize = 20;

const VIEWS_LIKES_COMMENTS: [Metric; 3] =
    [Metric::ViewCount, Metric::LikeCount, Metric::CommentCount];

// ── Page ──────────────────────────────────────────────────────────────────────

/// The two pages offered by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Channels,
    Videos,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Channels, Page::Videos];

    /// Parse a `--page` value.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "channels" => Ok(Page::Channels),
            "videos" => Ok(Page::Videos),
            other => Err(ChartsError::Config(format!("unknown page '{other}'"))),
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Page::Channels => "Channels",
            Page::Videos => "Videos",
        }
    }

    /// Page heading.
    pub fn heading(self) -> &'static str {
        match self {
            Page::Channels => "Burundi Music Channels Dashboard",
            Page::Videos => "Burundi Music Charts",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Page::Channels => Page::Videos,
            Page::Videos => Page::Channels,
        }
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// A labelled single number, e.g. an average.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: String,
    pub value: Option<u64>,
}

/// What a section displays.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Ranking(RankingResult),
    Stats(Vec<Stat>),
    Bars(BarSeries),
    Scatter(ScatterSeries),
    Counts {
        x_label: &'static str,
        y_label: &'static str,
        counts: Vec<CategoryCount>,
    },
    /// The section could not be computed; holds the error message.
    Unavailable(String),
}

/// One titled block of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub content: SectionContent,
}

impl Section {
    /// Build a section, turning a failure into [`SectionContent::Unavailable`].
    fn build(title: impl Into<String>, content: Result<SectionContent>) -> Self {
        let title = title.into();
        let content = content.unwrap_or_else(|e| {
            warn!("section '{}' unavailable: {}", title, e);
            SectionContent::Unavailable(e.to_string())
        });
        Self { title, content }
    }
}

// ── Channels page ─────────────────────────────────────────────────────────────

/// Sections of the channels page.
pub fn channels_page(channels: &ChannelTable) -> Vec<Section> {
    vec![
        Section::build(
            "Top 10 Channels by view count",
            rank(
                channels,
                &RankKey::column(Metric::ViewCount),
                TOP_N,
                SortOrder::Descending,
                &[Metric::ViewCount],
            )
            .map(SectionContent::Ranking),
        ),
        Section::build(
            "Top 10 Channels by subscriber count",
            rank(
                channels,
                &RankKey::column(Metric::SubscriberCount),
                TOP_N,
                SortOrder::Descending,
                &[Metric::SubscriberCount],
            )
            .map(SectionContent::Ranking),
        ),
        Section::build(
            "Channels by View Count",
            bar_series(channels, Metric::ViewCount, SortOrder::Ascending).map(SectionContent::Bars),
        ),
        Section::build(
            "Channels by Subscriber Count",
            bar_series(channels, Metric::SubscriberCount, SortOrder::Ascending)
                .map(SectionContent::Bars),
        ),
        Section::build("Averages per channel", channel_averages(channels)),
        Section::build(
            "Relationship between Views and Subscribers",
            scatter_series(
                channels,
                Metric::ViewCount,
                Metric::SubscriberCount,
                Some(Metric::VideoCount),
            )
            .map(SectionContent::Scatter),
        ),
        Section::build(
            "Relationship between Views and Number of Videos upload",
            scatter_series(
                channels,
                Metric::ViewCount,
                Metric::VideoCount,
                Some(Metric::VideoCount),
            )
            .map(SectionContent::Scatter),
        ),
    ]
}

fn channel_averages(channels: &ChannelTable) -> Result<SectionContent> {
    Ok(SectionContent::Stats(vec![
        Stat {
            label: "What is the average number of views per channel?".to_string(),
            value: mean_metric(channels, Metric::ViewCount)?,
        },
        Stat {
            label: "What is the average number of subscribers per channel?".to_string(),
            value: mean_metric(channels, Metric::SubscriberCount)?,
        },
    ]))
}

// ── Videos page ───────────────────────────────────────────────────────────────

/// Sections of the videos page.
///
/// `now` anchors the month window; `year` selects the yearly chart (no year
/// means the table has no videos, and the chart is empty).
pub fn videos_page(videos: &VideoTable, year: Option<i32>, now: DateTime<Utc>) -> Vec<Section> {
    let year_title = match year {
        Some(y) => format!("Top Charts of {y}"),
        None => "Top Charts each year".to_string(),
    };

    vec![
        Section::build("Top Charters this month", top_this_month(videos, now)),
        Section::build(year_title, top_of_year(videos, year)),
        Section::build(
            "View Count vs Like Count for Top 100 Videos",
            top_videos_scatter(videos),
        ),
        Section::build(
            "Category and video distribution",
            top_categories(videos, TOP_CATEGORIES).map(|counts| SectionContent::Counts {
                x_label: "Category",
                y_label: "Number of Videos",
                counts,
            }),
        ),
        Section::build(
            "The most frequently used tags in the videos",
            top_tags(videos, TOP_TAGS).map(|counts| SectionContent::Counts {
                x_label: "Tag",
                y_label: "Count",
                counts,
            }),
        ),
        Section::build(
            "Audience Engagement",
            scatter_series(
                videos,
                Metric::ViewCount,
                Metric::LikeCount,
                Some(Metric::CommentCount),
            )
            .map(SectionContent::Scatter),
        ),
    ]
}

fn top_this_month(videos: &VideoTable, now: DateTime<Utc>) -> Result<SectionContent> {
    let month = filter_month_window(videos, now)?;
    rank(
        &month,
        &RankKey::Composite,
        TOP_N,
        SortOrder::Descending,
        &VIEWS_LIKES_COMMENTS,
    )
    .map(SectionContent::Ranking)
}

fn top_of_year(videos: &VideoTable, year: Option<i32>) -> Result<SectionContent> {
    let key = RankKey::Columns(VIEWS_LIKES_COMMENTS.to_vec());
    let subset = match year {
        Some(y) => filter_year(videos, y)?,
        None => videos.derive(Vec::new()),
    };
    rank(&subset, &key, TOP_N, SortOrder::Descending, &VIEWS_LIKES_COMMENTS)
        .map(SectionContent::Ranking)
}

fn top_videos_scatter(videos: &VideoTable) -> Result<SectionContent> {
    videos.require(Metric::ViewCount.column())?;
    let top = top_n_by(
        videos,
        |v| v.view_count,
        SCATTER_TOP_VIDEOS,
        SortOrder::Descending,
    );
    let subset = videos.derive(top.into_iter().cloned().collect());
    scatter_series(&subset, Metric::ViewCount, Metric::LikeCount, None).map(SectionContent::Scatter)
}

// ── YearSelector ──────────────────────────────────────────────────────────────

/// The year picker of the "Top Charts each year" table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearSelector {
    years: Vec<i32>,
    index: usize,
}

impl YearSelector {
    /// Options in encounter order; `preferred` is selected when present,
    /// otherwise the first year.
    pub fn new(years: Vec<i32>, preferred: Option<i32>) -> Self {
        let index = preferred
            .and_then(|p| years.iter().position(|&y| y == p))
            .unwrap_or(0);
        Self { years, index }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn selected(&self) -> Option<i32> {
        self.years.get(self.index).copied()
    }

    pub fn next(&mut self) {
        if !self.years.is_empty() {
            self.index = (self.index + 1) % self.years.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.years.is_empty() {
            self.index = (self.index + self.years.len() - 1) % self.years.len();
        }
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// A fully assembled page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: Page,
    pub sections: Vec<Section>,
}

/// Interactive state shared by the TUI and the text report.
#[derive(Debug)]
pub struct Dashboard {
    data: DataManager,
    page: Page,
    years: YearSelector,
    /// A `--year` that is not in the data.
    pinned_year: Option<i32>,
}

impl Dashboard {
    /// Load both tables and set up the year picker.
    ///
    /// Load failures are fatal. A timestamp error while listing years only
    /// leaves the picker empty; the yearly section then reports it.
    pub fn new(data: DataManager, page: Page, year: Option<i32>) -> Result<Self> {
        data.channels()?;
        let videos = data.videos()?;
        debug!("tables resident: {}", data.is_loaded());

        let options = available_years(&videos).unwrap_or_else(|e| {
            warn!("year selector unavailable: {}", e);
            Vec::new()
        });
        let pinned_year = year.filter(|y| !options.contains(y));
        if let Some(y) = pinned_year {
            warn!("no videos published in {}", y);
        }

        Ok(Self {
            data,
            page,
            years: YearSelector::new(options, year),
            pinned_year,
        })
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.next();
    }

    pub fn years(&self) -> &YearSelector {
        &self.years
    }

    /// The year the yearly chart shows.
    pub fn selected_year(&self) -> Option<i32> {
        self.pinned_year.or_else(|| self.years.selected())
    }

    pub fn next_year(&mut self) {
        self.pinned_year = None;
        self.years.next();
    }

    pub fn previous_year(&mut self) {
        self.pinned_year = None;
        self.years.previous();
    }

    /// Assemble the current page.
    pub fn current(&self) -> Result<PageView> {
        self.build(self.page, Utc::now())
    }

    /// Assemble `page` with an explicit clock.
    pub fn build(&self, page: Page, now: DateTime<Utc>) -> Result<PageView> {
        let sections = match page {
            Page::Channels => {
                let channels = self.data.channels()?;
                channels_page(&channels)
            }
            Page::Videos => {
                let videos = self.data.videos()?;
                videos_page(&videos, self.selected_year(), now)
            }
        };
        Ok(PageView { page, sections })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
