use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{CategoryScope, ViewMode};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.categories.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No categories yet.",
                theme::dim_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :category <name> [income|expense|both]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY)),
        );
        f.render_widget(msg, area);
        return;
    }

    match app.categories_view {
        ViewMode::List => render_list(f, area, app),
        ViewMode::Grid => render_grid(f, area, app),
    }
}

fn scope_style(scope: CategoryScope) -> Style {
    match scope {
        CategoryScope::Income => theme::income_style(),
        CategoryScope::Expense => theme::expense_style(),
        CategoryScope::Both => theme::dim_style(),
    }
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let name_width = area.width.saturating_sub(20) as usize;
    let items: Vec<ListItem> = app
        .categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, cat)| {
            let style = if i == app.category_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let scope = if i == app.category_index {
                style
            } else {
                scope_style(cat.scope)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", theme::icon_glyph(cat.icon)), style),
                Span::styled(
                    format!("{:<width$}", truncate(&cat.name, name_width), width = name_width),
                    style,
                ),
                Span::styled(format!("{:>8} ", cat.scope.as_str()), scope),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Categories ({}) ", app.categories.len()),
                theme::dim_style(),
            )),
    );
    f.render_widget(list, area);
}

/// Grid view: three columns of compact category tiles.
fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let tile_height = 3_u16;
    let columns = 3_usize;
    let rows = ((area.height / tile_height).max(1)) as usize;
    let per_page = rows * columns;
    let start = (app.category_index / per_page) * per_page;

    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(tile_height); rows])
        .split(area);

    for (row, row_area) in row_chunks.iter().enumerate() {
        let col_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(*row_area);

        for (col, col_area) in col_chunks.iter().enumerate() {
            let idx = start + row * columns + col;
            let cat = match app.categories.get(idx) {
                Some(c) => c,
                None => continue,
            };
            let selected = idx == app.category_index;
            let border = if selected { theme::ACCENT } else { theme::OVERLAY };

            let tile = Paragraph::new(Line::from(vec![
                Span::raw(format!("{} ", theme::icon_glyph(cat.icon))),
                Span::styled(
                    truncate(&cat.name, col_area.width.saturating_sub(12) as usize),
                    theme::normal_style(),
                ),
                Span::styled(format!(" {}", cat.scope.as_str()), scope_style(cat.scope)),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            );
            f.render_widget(tile, *col_area);
        }
    }
}
