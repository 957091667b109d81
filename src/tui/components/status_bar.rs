// Status bar component
//
// Renders the session identity, backend URL and context key hints.

use crate::tui::app::{App, Screen};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn hints(app: &App, compact: bool) -> &'static str {
    let form_open = match app.screen {
        Screen::Login => {
            return if compact {
                "Enter sign in │ F2 register"
            } else {
                "Tab/↑↓ field │ Enter sign in │ F2 register │ Ctrl+C quit"
            };
        }
        Screen::Register => {
            return if compact {
                "Enter register │ Esc back"
            } else {
                "Tab/↑↓ field │ Enter register │ Esc back to sign in │ Ctrl+C quit"
            };
        }
        Screen::Pac => app.pacs.controller.form().is_some(),
        Screen::Asignaturas => app.asignaturas.controller.form().is_some(),
    };
    match (form_open, compact) {
        (true, false) => "Tab/↑↓ field │ Space toggle │ ←→ choose │ Enter submit │ Esc cancel",
        (true, true) => "Tab field │ Enter submit │ Esc",
        (false, false) => "n new │ e edit │ d delete │ r reload │ L logs │ o logout │ q quit",
        (false, true) => "n/e/d/r │ o logout │ q",
    }
}

/// Render the status bar
///
/// Adapts to terminal width: narrow terminals drop the URL and shorten hints.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);
    let user = app
        .session
        .snapshot()
        .user
        .map(|u| u.email)
        .unwrap_or_else(|| "not logged in".to_string());

    let text = if bp.at_least(Breakpoint::Wide) {
        format!(" {} │ {} │ {}", user, app.api_url(), hints(app, false))
    } else {
        format!(" {} │ {}", user, hints(app, !bp.at_least(Breakpoint::Normal)))
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
