//! Application state and TUI event loop for Indundi Charts.
//!
//! [`App`] owns the theme, the [`Dashboard`] and the section that has focus.
//! The page on screen is rebuilt from the loaded tables after every key press,
//! and on a tick once the calendar month rolls over.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, warn};

use charts_core::error::Result;
use charts_core::time_utils::start_of_month;
use charts_runtime::dashboard::{Dashboard, Page, PageView, Section, SectionContent};

use crate::chart_view;
use crate::components::header::Header;
use crate::components::sidebar;
use crate::table_view;
use crate::themes::Theme;

/// Width of the section list on the left.
const SECTION_LIST_WIDTH: u16 = 34;

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    dashboard: Dashboard,
    /// The assembled page on screen.
    view: PageView,
    /// Index of the focused section.
    focus: usize,
    /// Snapshot description shown in the header.
    source: String,
    /// Start of the month the view was built in.
    built_for: DateTime<Utc>,
}

impl App {
    /// Build the app and assemble the initial page.
    pub fn new(theme_name: &str, dashboard: Dashboard, source: impl Into<String>) -> Result<Self> {
        let now = Utc::now();
        let view = dashboard.build(dashboard.page(), now)?;
        Ok(Self {
            theme: Theme::from_name(theme_name),
            dashboard,
            view,
            focus: 0,
            source: source.into(),
            built_for: start_of_month(now),
        })
    }

    pub fn page(&self) -> Page {
        self.view.page
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop stays
    /// on the current thread.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => self.tick(Utc::now()),
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.handle_key_at(key, Utc::now())
    }

    /// [`App::handle_key`] with an explicit clock for the month window.
    pub fn handle_key_at(&mut self, key: KeyEvent, now: DateTime<Utc>) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.dashboard.next_page();
                self.focus = 0;
            }
            KeyCode::Char('1') => self.show_page(Page::Channels),
            KeyCode::Char('2') => self.show_page(Page::Videos),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus + 1 < self.view.sections.len() {
                    self.focus += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus = self.focus.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') if self.page() == Page::Videos => {
                self.dashboard.next_year();
            }
            KeyCode::Left | KeyCode::Char('h') if self.page() == Page::Videos => {
                self.dashboard.previous_year();
            }
            _ => {}
        }
        self.refresh(now);
        false
    }

    /// Rebuild the page when `now` has moved into a new month.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if start_of_month(now) != self.built_for {
            debug!("month rolled over; rebuilding page");
            self.refresh(now);
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current page into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let header = Header::new(self.page().heading(), &self.source, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), chunks[0]);

        sidebar::render_page_tabs(frame, chunks[1], self.page(), &self.theme);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SECTION_LIST_WIDTH), Constraint::Min(20)])
            .split(chunks[2]);
        self.render_section_list(frame, body[0]);
        if let Some(section) = self.view.sections.get(self.focus) {
            render_section(frame, body[1], section, &self.theme, true);
        }

        frame.render_widget(Paragraph::new(self.help_line()), chunks[3]);
    }

    fn render_section_list(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .view
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                if i == self.focus {
                    Line::from(Span::styled(format!("> {}", section.title), self.theme.tab_active))
                } else {
                    Line::from(Span::styled(format!("  {}", section.title), self.theme.text))
                }
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.table_border)
            .title(" Sections ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn help_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(" Tab", self.theme.bold),
            Span::styled(" page  ", self.theme.dim),
            Span::styled("↑/↓", self.theme.bold),
            Span::styled(" section  ", self.theme.dim),
        ];
        if self.page() == Page::Videos {
            let year = self
                .dashboard
                .selected_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "none".to_string());
            spans.push(Span::styled("←/→", self.theme.bold));
            spans.push(Span::styled(format!(" year ({year})  "), self.theme.dim));
        }
        spans.push(Span::styled("q", self.theme.bold));
        spans.push(Span::styled(" quit", self.theme.dim));
        Line::from(spans)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn show_page(&mut self, page: Page) {
        if self.page() != page {
            self.dashboard.set_page(page);
            self.focus = 0;
        }
    }

    /// Reassemble the current page as of `now`.
    fn refresh(&mut self, now: DateTime<Utc>) {
        match self.dashboard.build(self.page(), now) {
            Ok(view) => {
                debug!("showing {} page", view.page.label());
                self.focus = self.focus.min(view.sections.len().saturating_sub(1));
                self.view = view;
                self.built_for = start_of_month(now);
            }
            Err(e) => warn!("could not rebuild page: {}", e),
        }
    }
}

/// Render one section with the widget matching its content.
pub fn render_section(frame: &mut Frame, area: Rect, section: &Section, theme: &Theme, focused: bool) {
    let title = section.title.as_str();
    match &section.content {
        SectionContent::Ranking(ranking) => {
            table_view::render_ranking_table(frame, area, title, ranking, theme, focused)
        }
        SectionContent::Stats(stats) => table_view::render_stats(frame, area, title, stats, theme, focused),
        SectionContent::Bars(series) => {
            chart_view::render_bar_chart(frame, area, title, series, theme, focused)
        }
        SectionContent::Scatter(series) => {
            chart_view::render_scatter(frame, area, title, series, theme, focused)
        }
        SectionContent::Counts {
            x_label,
            y_label,
            counts,
        } => chart_view::render_count_chart(frame, area, title, x_label, y_label, counts, theme, focused),
        SectionContent::Unavailable(message) => {
            table_view::render_unavailable(frame, area, title, message, theme, focused)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
