use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::ViewMode;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_cents, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.accounts.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No accounts yet.",
                theme::dim_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :account <name> [icon] [starting balance]",
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

    match app.accounts_view {
        ViewMode::List => render_list(f, area, app),
        ViewMode::Grid => render_grid(f, area, app),
    }
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let name_width = area.width.saturating_sub(36) as usize;
    let items: Vec<ListItem> = app
        .accounts
        .iter()
        .enumerate()
        .skip(app.account_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, account)| {
            let style = if i == app.account_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let balance_style = if i == app.account_index {
                style
            } else if account.balance_cents >= 0 {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let last_used = account.last_used_at.get(..10).unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", theme::icon_glyph(account.icon)), style),
                Span::styled(
                    format!("{:<width$}", truncate(&account.name, name_width), width = name_width),
                    style,
                ),
                Span::styled(
                    format!("{:>14}", format_cents(account.balance_cents)),
                    balance_style,
                ),
                Span::styled(format!("   last used {last_used} "), theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Accounts ({}) ", app.accounts.len()),
                theme::dim_style(),
            )),
    );
    f.render_widget(list, area);
}

/// Grid view: account cards in two columns.
fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let card_height = 4_u16;
    let columns = 2_usize;
    let rows = ((area.height / card_height).max(1)) as usize;
    let per_page = rows * columns;

    let start = (app.account_index / per_page) * per_page;

    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(card_height); rows])
        .split(area);

    for (row, row_area) in row_chunks.iter().enumerate() {
        let col_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);

        for (col, col_area) in col_chunks.iter().enumerate() {
            render_card(f, *col_area, app, start + row * columns + col);
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, app: &App, idx: usize) {
    let account = match app.accounts.get(idx) {
        Some(a) => a,
        None => return,
    };
    let selected = idx == app.account_index;
    let border = if selected { theme::ACCENT } else { theme::OVERLAY };

    let balance_style = if account.balance_cents >= 0 {
        theme::income_style().add_modifier(Modifier::BOLD)
    } else {
        theme::expense_style().add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(
                " {} {} ",
                theme::icon_glyph(account.icon),
                truncate(&account.name, area.width.saturating_sub(8) as usize)
            ),
            Style::default()
                .fg(if selected { theme::ACCENT } else { theme::TEXT_DIM })
                .add_modifier(Modifier::BOLD),
        ));

    let body = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Balance: ", theme::dim_style()),
            Span::styled(format_cents(account.balance_cents), balance_style),
        ]),
        Line::from(Span::styled(
            format!("last used {}", account.last_used_at.get(..10).unwrap_or("")),
            theme::dim_style(),
        )),
    ])
    .block(block);

    f.render_widget(body, area);
}
