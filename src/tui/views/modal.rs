// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help: keyboard shortcuts
// - Confirm delete: yes/no prompt
// - Credentials: issued institutional email and password

use super::centered_rect;
use crate::account;
use crate::model::IssuedCredentials;
use crate::tui::app::App;
use crate::tui::modal::Modal;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::ConfirmDelete { prompt, .. } => render_confirm(f, app, prompt),
        Modal::Credentials(issued) => render_credentials(f, app, issued),
    }
}

fn frame_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border_focused))
        .title(Line::from(title).style(app.theme.header()))
        .style(Style::default().bg(app.theme.bg))
}

fn draw(f: &mut Frame, area: Rect, content: Text<'_>, block: Block<'_>) {
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(content).block(block), area);
}

/// Render the help modal overlay
fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.border_focused);
    let desc_style = Style::default().fg(app.theme.fg);
    let header_style = app.theme.header();

    // Helper to create a keybind line: "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Screens", header_style)),
        kb("F1, 1", "PAC (Login when signed out)"),
        kb("F2, 2", "Asignaturas (Register when signed out)"),
        kb("o", "Log out"),
        Line::raw(""),
        Line::from(Span::styled("  Lists", header_style)),
        kb("↑/↓, j/k", "Move selection"),
        kb("n", "New entry"),
        kb("e, Enter", "Edit selected"),
        kb("d", "Delete selected"),
        kb("r", "Reload"),
        Line::raw(""),
        Line::from(Span::styled("  Forms", header_style)),
        kb("Tab, ↓", "Next field"),
        kb("Shift+Tab, ↑", "Previous field"),
        kb("Space", "Toggle checkbox"),
        kb("←/→", "Choose PAC"),
        kb("Enter", "Submit"),
        kb("Esc", "Cancel"),
        Line::raw(""),
        Line::from(Span::styled("  Other", header_style)),
        kb("L", "Toggle logs panel"),
        kb("?", "This help"),
        kb("q, Ctrl+C", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  Press Esc or ? to close",
            Style::default().fg(app.theme.muted),
        )),
    ]);

    let height = content.lines.len() as u16 + 2;
    let area = centered_rect(56, height, f.area());
    draw(f, area, content, frame_block(app, " Help "));
}

fn render_confirm(f: &mut Frame, app: &App, prompt: &str) {
    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", prompt),
            Style::default().fg(app.theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(app.theme.error)),
            Span::styled(" delete    ", Style::default().fg(app.theme.fg)),
            Span::styled("n/Esc", Style::default().fg(app.theme.border_focused)),
            Span::styled(" keep", Style::default().fg(app.theme.fg)),
        ]),
    ]);
    let width = (prompt.chars().count() as u16 + 6).max(32);
    let area = centered_rect(width, 6, f.area());
    draw(f, area, content, frame_block(app, " Confirm "));
}

fn render_credentials(f: &mut Frame, app: &App, issued: &IssuedCredentials) {
    let value_style = Style::default()
        .fg(app.theme.selected_fg)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            "  Registration complete. Store these credentials:",
            Style::default().fg(app.theme.success),
        )),
        Line::raw(""),
    ];
    lines.extend(account::credentials_text(issued).lines().map(|line| {
        Line::from(Span::styled(format!("    {}", line), value_style))
    }));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  y copy to clipboard · Enter close",
        Style::default().fg(app.theme.muted),
    )));

    let height = lines.len() as u16 + 2;
    let area = centered_rect(58, height, f.area());
    draw(f, area, Text::from(lines), frame_block(app, " Credentials "));
}
