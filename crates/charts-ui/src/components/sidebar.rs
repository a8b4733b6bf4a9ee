use charts_runtime::dashboard::Page;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::themes::Theme;

/// Prompt shown above the page switcher.
pub const PROMPT: &str = "What do you want to analyze?";

/// Page switcher rendered as a row of tabs.
pub fn render_page_tabs(frame: &mut Frame, area: Rect, current: Page, theme: &Theme) {
    let titles: Vec<Line> = Page::ALL.iter().map(|p| Line::from(p.label())).collect();
    let selected = Page::ALL.iter().position(|&p| p == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme.tab_inactive)
        .highlight_style(theme.tab_active)
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} (Tab) ", PROMPT)),
        );

    frame.render_widget(tabs, area);
}
