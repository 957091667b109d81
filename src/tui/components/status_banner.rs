// Status banner - one line for the page's success or error message
//
// The error slot wins when both are set; it's the one that needs attention.

use crate::crud::StatusBoard;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Banner text and whether it is an error
pub fn message(status: &StatusBoard) -> Option<(&str, bool)> {
    status
        .error_text()
        .map(|text| (text, true))
        .or_else(|| status.success_text().map(|text| (text, false)))
}

pub fn render(f: &mut Frame, area: Rect, status: &StatusBoard, theme: &Theme) {
    let Some((text, is_error)) = message(status) else {
        return;
    };
    let (icon, color) = if is_error {
        ("✗", theme.error)
    } else {
        ("✓", theme.success)
    };
    let line = Line::from(vec![Span::styled(
        format!(" {} {}", icon, text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )]);
    f.render_widget(Paragraph::new(line), area);
}
