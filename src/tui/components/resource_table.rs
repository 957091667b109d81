// Resource table - the list half of a resource screen
//
// Columns come from the resource itself; foreign keys are resolved against
// the page's loaded references on every frame.

use crate::crud::{ListController, ManagedResource, Phase};
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max` display columns, marking the cut with "…"
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Column widths: share the available width evenly, capped by content
fn column_widths<R: ManagedResource>(rows: &[Vec<String>], available: u16) -> Vec<u16> {
    let columns = R::COLUMNS.len().max(1) as u16;
    let share = (available.saturating_sub(columns)) / columns;
    R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let content = rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0) as u16;
            content.min(share.max(4))
        })
        .collect()
}

pub fn render<R: ManagedResource>(
    f: &mut Frame,
    area: Rect,
    controller: &ListController<R>,
    theme: &Theme,
) {
    let focused = controller.form().is_none();
    let title = match controller.phase() {
        Phase::Loading if controller.items().is_empty() => format!(" {} (loading…) ", R::PLURAL),
        _ => format!(" {} ({}) ", R::PLURAL, controller.items().len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(theme.block_border(focused))
        .title(Line::from(title).style(theme.header()));

    if controller.items().is_empty() {
        let hint = if controller.phase() == Phase::Loading {
            "Loading…".to_string()
        } else {
            format!("No {} yet. Press n to create one.", R::PLURAL)
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Vec<String>> = controller
        .items()
        .iter()
        .map(|item| item.cells(controller.refs()))
        .collect();
    let widths = column_widths::<R>(&rows, area.width.saturating_sub(2));

    let header = Row::new(R::COLUMNS.iter().map(|h| Cell::from(*h)))
        .style(theme.header().add_modifier(Modifier::UNDERLINED));
    let body = rows.iter().map(|cells| {
        Row::new(
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| Cell::from(truncate(cell, *w as usize))),
        )
        .style(Style::default().fg(theme.fg))
    });

    let table = Table::new(body, widths.iter().map(|w| Constraint::Length(*w)))
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(theme.selected())
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(controller.selected()));
    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("Programación I", 20), "Programación I");
        assert_eq!(truncate("Programación I", 8), "Program…");
        assert_eq!(truncate("数学分析", 5), "数学…");
        assert_eq!(truncate("abc", 0), "");
    }
}
