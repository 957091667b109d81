// Title bar component
//
// Renders the app title, the active screen tabs and a busy spinner.

use crate::tui::app::{App, Screen};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " Matricula ",
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    )];

    let tabs: &[(Screen, &str)] = if app.session.is_authenticated() {
        &[(Screen::Pac, "F1"), (Screen::Asignaturas, "F2")]
    } else {
        &[(Screen::Login, "F1"), (Screen::Register, "F2")]
    };
    for (screen, key) in tabs {
        let style = if *screen == app.screen {
            theme.selected()
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", key, screen.name()), style));
    }

    if app.is_busy() {
        spans.push(Span::styled(
            format!("  {} working", app.spinner_char()),
            Style::default().fg(theme.busy),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}
