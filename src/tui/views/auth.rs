// Login and registration screens

use super::centered_rect;
use crate::tui::app::App;
use crate::tui::components::form_panel::{self, FormView};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
    Frame,
};

const FORM_WIDTH: u16 = 56;

pub fn render_login(f: &mut Frame, area: Rect, app: &App) {
    let form = FormView {
        title: " Sign in ".to_string(),
        fields: app.login.fields(),
        focus: app.login.focus,
        error: app.login.error.as_ref(),
        submitting: app.login.submitting,
        spinner: app.spinner_char(),
    };
    let rect = centered_rect(FORM_WIDTH, form.height(), area);
    form_panel::render(f, rect, &form, &app.theme, false);
    render_hint(f, rect, area, app, "No account? Press F2 to register");
}

pub fn render_register(f: &mut Frame, area: Rect, app: &App) {
    let form = FormView {
        title: " Register student ".to_string(),
        fields: app.register.fields(),
        focus: app.register.focus,
        error: app.register.error.as_ref(),
        submitting: app.register.submitting,
        spinner: app.spinner_char(),
    };
    let rect = centered_rect(FORM_WIDTH, form.height(), area);
    form_panel::render(f, rect, &form, &app.theme, false);
    render_hint(f, rect, area, app, "Press F1 to go back to sign in");
}

fn render_hint(f: &mut Frame, form: Rect, area: Rect, app: &App, text: &str) {
    let y = form.bottom();
    if y >= area.bottom() {
        return;
    }
    let hint = Rect::new(form.x, y, form.width, 1);
    f.render_widget(
        Paragraph::new(Line::from(text).centered()).style(Style::default().fg(app.theme.muted)),
        hint,
    );
}
