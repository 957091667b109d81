// Form panel - labelled fields with focus, one error line and a busy state
//
// Shared by the resource forms and the login/register screens. It only
// renders; editing goes through the form types.

use crate::crud::{Field, FieldKind, FormError};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub struct FormView<'a> {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<&'a FormError>,
    pub submitting: bool,
    pub spinner: char,
}

impl FormView<'_> {
    /// Rows needed: fields, gap, feedback line, footer and borders
    pub fn height(&self) -> u16 {
        self.fields.len() as u16 + 6
    }
}

fn value_span(field: &Field, focused: bool, theme: &Theme) -> Span<'static> {
    let text = match field.kind {
        FieldKind::Choice => format!("◀ {} ▶", field.value),
        _ if focused => format!("{}▏", field.value),
        _ => field.value.clone(),
    };
    let style = if focused {
        Style::default()
            .fg(theme.selected_fg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };
    Span::styled(text, style)
}

/// Render the form; `overlay` clears what is underneath first
pub fn render(f: &mut Frame, area: Rect, form: &FormView<'_>, theme: &Theme, overlay: bool) {
    let label_width = form
        .fields
        .iter()
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = Vec::with_capacity(form.fields.len() + 3);
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.border_focused)),
            Span::styled(
                format!("{:<width$}  ", field.label, width = label_width),
                Style::default().fg(theme.muted),
            ),
            value_span(field, focused, theme),
        ]));
    }
    lines.push(Line::raw(""));

    let feedback = if form.submitting {
        Line::from(Span::styled(
            format!("{} Submitting…", form.spinner),
            Style::default().fg(theme.busy),
        ))
    } else if let Some(error) = form.error {
        Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::raw("")
    };
    lines.push(feedback);
    lines.push(Line::from(Span::styled(
        "Enter submit · Esc cancel",
        Style::default().fg(theme.muted),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(theme.block_border(true))
        .title(Line::from(form.title.as_str()).style(theme.header()))
        .style(Style::default().bg(theme.bg));

    if overlay {
        f.render_widget(Clear, area);
    }
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
