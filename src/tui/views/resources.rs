// Resource screens - table, status banner and the create/edit form overlay

use super::centered_rect;
use crate::crud::Draft;
use crate::tui::app::{App, PageAccess};
use crate::tui::components::form_panel::{self, FormView};
use crate::tui::components::{resource_table, status_banner};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

const FORM_WIDTH: u16 = 60;

pub fn render<R: PageAccess>(f: &mut Frame, area: Rect, app: &App) {
    let controller = &R::page(app).controller;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    status_banner::render(f, chunks[0], controller.status(), &app.theme);
    resource_table::render(f, chunks[1], controller, &app.theme);

    if let Some(form) = controller.form() {
        let verb = if form.is_edit() { "Edit" } else { "New" };
        let view = FormView {
            title: format!(" {} {} ", verb, R::LABEL),
            fields: form.draft.fields(controller.refs()),
            focus: form.focus,
            error: form.error.as_ref(),
            submitting: form.submitting,
            spinner: app.spinner_char(),
        };
        let rect = centered_rect(FORM_WIDTH, view.height(), area);
        form_panel::render(f, rect, &view, &app.theme, true);
    }
}
