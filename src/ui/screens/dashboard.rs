use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_cents, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Accounts + recent transactions
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_account_balances(f, columns[0], app);
    render_recent_transactions(f, columns[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let net = app.stats.net_cents();
    let total = app.total_balance_cents();

    render_card(f, cards[0], "Income", app.stats.income_cents, theme::GREEN);
    render_card(f, cards[1], "Expenses", app.stats.expense_cents, theme::RED);
    render_card(
        f,
        cards[2],
        "Net",
        net,
        if net >= 0 { theme::GREEN } else { theme::RED },
    );
    render_card(
        f,
        cards[3],
        "All Accounts",
        total,
        if total >= 0 { theme::GREEN } else { theme::RED },
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, cents: i64, color: ratatui::style::Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_cents(cents),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_account_balances(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Accounts ", theme::dim_style()));

    if app.accounts.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No accounts yet.", theme::dim_style())),
            Line::from(Span::styled(
                "Create one with :account <name> [icon] [balance]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let name_width = area.width.saturating_sub(18) as usize;
    let items: Vec<ListItem> = app
        .accounts
        .iter()
        .map(|account| {
            let balance_style = if account.balance_cents >= 0 {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", theme::icon_glyph(account.icon))),
                Span::styled(
                    format!("{:<width$}", truncate(&account.name, name_width), width = name_width),
                    theme::normal_style(),
                ),
                Span::styled(format!("{:>12}", format_cents(account.balance_cents)), balance_style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_recent_transactions(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} ", app.range_preset()),
            theme::dim_style(),
        ));

    if app.transactions.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No transactions in this range.",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "Record one with :income or :expense",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let desc_width = area.width.saturating_sub(28) as usize;
    let items: Vec<ListItem> = app
        .transactions
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|txn| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", txn.date()), theme::dim_style()),
                Span::styled(
                    format!("{:<width$}", truncate(&txn.description, desc_width), width = desc_width),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>12}", format_cents(txn.signed_amount_cents())),
                    theme::kind_style(txn.kind),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
