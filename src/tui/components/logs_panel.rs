//! Logs panel component
//!
//! Displays the newest captured log entries, color-coded by level. Always
//! follows the tail; the buffer is read fresh every frame.

use crate::logging::{LogBuffer, LogEntry};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn format_entry(entry: &LogEntry) -> String {
    format!(
        "{} {:<5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

pub fn render(f: &mut Frame, area: Rect, buffer: &LogBuffer, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = buffer
        .tail(visible)
        .iter()
        .map(|entry| ListItem::new(format_entry(entry)).style(theme.log_level(entry.level)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(Line::from(vec![
            Span::styled(" System Logs ", theme.header()),
            Span::styled(format!("({}) ", buffer.len()), Style::default().fg(theme.muted)),
        ]));

    f.render_widget(List::new(items).block(block), area);
}
