use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_cents, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.transactions.is_empty() {
        let hint = if app.search_input.is_empty() {
            "Record one with :income <amount> <desc> or :expense <amount> <desc>"
        } else {
            "No matches. Esc clears the search."
        };
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No transactions in this range.",
                theme::dim_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
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

    // Column widths: date 10, amount 13, category 14, account 14, rest description
    let desc_width = area.width.saturating_sub(56).max(10) as usize;

    let header = Line::from(vec![
        Span::styled(" Date       ", theme::header_style()),
        Span::styled(
            format!("{:<width$}", "Description", width = desc_width + 1),
            theme::header_style(),
        ),
        Span::styled(format!("{:<15}", "Category"), theme::header_style()),
        Span::styled(format!("{:<15}", "Account"), theme::header_style()),
        Span::styled(format!("{:>12} ", "Amount"), theme::header_style()),
    ]);

    let mut items: Vec<ListItem> = vec![ListItem::new(header)];

    let page = area.height.saturating_sub(3) as usize; // borders + header
    items.extend(
        app.transactions
            .iter()
            .enumerate()
            .skip(app.transaction_scroll)
            .take(page.max(1))
            .map(|(i, txn)| {
                let row_style = if i == app.transaction_index {
                    theme::selected_style()
                } else if i % 2 == 1 {
                    theme::alt_row_style()
                } else {
                    theme::normal_style()
                };

                let amount_style = if i == app.transaction_index {
                    row_style
                } else {
                    theme::kind_style(txn.kind)
                };

                // Transfers show the receiving account in the category slot
                let category = if txn.is_transfer() {
                    txn.target_account_id
                        .map(|id| format!("> {}", app.account_name(id)))
                        .unwrap_or_default()
                } else {
                    app.category_name(txn.category_id)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", txn.date()), row_style),
                    Span::styled(
                        format!(
                            "{:<width$}",
                            truncate(&txn.description, desc_width),
                            width = desc_width + 1
                        ),
                        row_style,
                    ),
                    Span::styled(format!("{:<15}", truncate(&category, 14)), row_style),
                    Span::styled(
                        format!("{:<15}", truncate(&app.account_name(txn.account_id), 14)),
                        row_style,
                    ),
                    Span::styled(
                        format!("{:>12} ", format_cents(txn.signed_amount_cents())),
                        amount_style,
                    ),
                ]))
            }),
    );

    let mut title = format!(" Transactions ({}) ", app.transactions.len());
    if app.transaction_filter_account.is_some() || app.transaction_filter_category.is_some() {
        title.push_str("[filtered] ");
    }
    if !app.search_input.is_empty() {
        title.push_str(&format!("[/{}] ", app.search_input));
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title, theme::dim_style())),
    );
    f.render_widget(list, area);
}
