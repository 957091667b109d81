// Views module - screen-level rendering logic
//
// - Auth: login and registration forms (no session)
// - Resources: PAC and Asignaturas pages (session required)
//
// The shell (title, optional logs, status bar) is shared; this module lays
// it out and dispatches the content slot by screen.

mod auth;
mod modal;
mod resources;

use super::app::{App, Screen};
use crate::model::{Asignatura, Pac};
use crate::tui::components::{logs_panel, status_bar, title_bar};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.bg));
    f.render_widget(bg_block, f.area());

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(8)];
    if app.show_logs {
        constraints.push(Constraint::Length(8));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    title_bar::render(f, chunks[0], app);
    render_content(f, chunks[1], app);
    if app.show_logs {
        logs_panel::render(f, chunks[2], &app.log_buffer, &app.theme);
    }
    status_bar::render(f, chunks[chunks.len() - 1], app);

    if let Some(modal) = &app.modal {
        modal::render(f, modal, app);
    }
    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

fn render_content(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Login => auth::render_login(f, area, app),
        Screen::Register => auth::render_register(f, area, app),
        Screen::Pac => resources::render::<Pac>(f, area, app),
        Screen::Asignaturas => resources::render::<Asignatura>(f, area, app),
    }
}

/// Calculate centered rect for overlays
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
