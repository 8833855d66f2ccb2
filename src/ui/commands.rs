use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::parse_cents;
use crate::db::Database;
use crate::ledger::daterange::RangePreset;
use crate::models::*;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit PlataSync", cmd_quit, r);
    register_command!("quit", "Quit PlataSync", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("a", "Go to Accounts", cmd_accounts, r);
    register_command!("accounts", "Go to Accounts", cmd_accounts, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "range",
        "Set date range (e.g. :range 7d). Presets: today, yesterday, 7d, 30d, month, last-month",
        cmd_range,
        r
    );
    register_command!("r", "Set date range (e.g. :r month)", cmd_range, r);
    register_command!("next-range", "Cycle to the next range preset", cmd_next_range, r);
    register_command!("prev-range", "Cycle to the previous range preset", cmd_prev_range, r);
    register_command!(
        "account",
        "Create account (e.g. :account Wallet cash 150.00)",
        cmd_account,
        r
    );
    register_command!(
        "rename-account",
        "Rename selected account",
        cmd_rename_account,
        r
    );
    register_command!(
        "delete-account",
        "Delete selected account",
        cmd_delete_account,
        r
    );
    register_command!(
        "category",
        "Create category (e.g. :category Pets expense)",
        cmd_category,
        r
    );
    register_command!(
        "delete-category",
        "Delete selected category",
        cmd_delete_category,
        r
    );
    register_command!(
        "income",
        "Record income (e.g. :income 2500.00 Paycheck)",
        cmd_income,
        r
    );
    register_command!(
        "expense",
        "Record expense (e.g. :expense 4.50 Coffee)",
        cmd_expense,
        r
    );
    register_command!(
        "e",
        "Record expense (e.g. :e 4.50 Coffee)",
        cmd_expense,
        r
    );
    register_command!(
        "transfer",
        "Transfer to another account (e.g. :transfer 100 Savings)",
        cmd_transfer,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!("rename", "Rename selected transaction", cmd_rename, r);
    register_command!("recat", "Re-categorize selected transaction", cmd_recat, r);
    register_command!(
        "filter-account",
        "Filter transactions by account (e.g. :filter-account Wallet)",
        cmd_filter_account,
        r
    );
    register_command!(
        "fa",
        "Filter transactions by account",
        cmd_filter_account,
        r
    );
    register_command!(
        "filter-category",
        "Filter transactions by category (e.g. :filter-category Groceries)",
        cmd_filter_category,
        r
    );
    register_command!(
        "fc",
        "Filter transactions by category",
        cmd_filter_category,
        r
    );
    register_command!(
        "search",
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search transactions (e.g. :s coffee)", cmd_search, r);
    register_command!("view", "Toggle list/grid view", cmd_view, r);
    register_command!("v", "Toggle list/grid view", cmd_view, r);
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/plata.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_accounts(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Accounts;
    app.refresh_accounts(db)?;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let presets: Vec<&str> = RangePreset::all().iter().map(|p| p.as_str()).collect();
        app.set_status(format!("Usage: :range <preset>. Presets: {}", presets.join(", ")));
        return Ok(());
    }

    match RangePreset::parse(args) {
        Some(preset) => {
            app.set_range(db, preset)?;
            app.set_status(format!("Range: {preset} ({})", app.range));
        }
        None => {
            app.set_status(format!("Unknown range preset: {args}"));
        }
    }
    Ok(())
}

fn cmd_next_range(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    cycle_range(app, db, 1)
}

fn cmd_prev_range(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    cycle_range(app, db, -1)
}

fn cycle_range(app: &mut App, db: &mut Database, delta: i32) -> anyhow::Result<()> {
    let presets = RangePreset::all();
    let idx = presets
        .iter()
        .position(|p| *p == app.range_preset())
        .unwrap_or(0);
    let next = if delta > 0 {
        (idx + 1) % presets.len()
    } else if idx == 0 {
        presets.len() - 1
    } else {
        idx - 1
    };
    let preset = presets[next];
    app.set_range(db, preset)?;
    app.set_status(format!("Range: {preset} ({})", app.range));
    Ok(())
}

fn cmd_account(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :account <name> [icon] [starting balance]");
        return Ok(());
    }

    // Trailing tokens: an optional starting balance, then an optional icon
    let mut name = args.to_string();
    let mut balance_cents = 0;
    let mut icon = Icon::Wallet;

    if let Some((rest, last)) = name.rsplit_once(' ') {
        if let Some(cents) = parse_cents(last) {
            balance_cents = cents;
            name = rest.to_string();
        }
    }
    if let Some((rest, last)) = name.rsplit_once(' ') {
        let lower = last.to_lowercase();
        if Icon::all().iter().any(|i| i.as_str() == lower) {
            icon = Icon::parse(&lower);
            name = rest.to_string();
        }
    }

    if name.is_empty() {
        app.set_status("Usage: :account <name> [icon] [starting balance]");
        return Ok(());
    }

    let account = Account::new(name.clone(), icon, balance_cents);
    db.insert_account(&account)?;
    app.refresh_accounts(db)?;
    app.set_status(format!("Created account: {name}"));
    Ok(())
}

fn cmd_rename_account(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Accounts || app.accounts.is_empty() {
        app.set_status("Navigate to Accounts and select one first");
        return Ok(());
    }
    if args.is_empty() {
        app.set_status("Usage: :rename-account <new name>");
        return Ok(());
    }

    if let Some(account) = app.selected_account() {
        if let Some(id) = account.id {
            db.update_account_profile(id, args, account.icon)?;
            app.refresh_accounts(db)?;
            app.set_status(format!("Renamed account to: {args}"));
        }
    }
    Ok(())
}

fn cmd_delete_account(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Accounts || app.accounts.is_empty() {
        app.set_status("Navigate to Accounts and select one first");
        return Ok(());
    }

    if let Some(account) = app.selected_account() {
        if let Some(id) = account.id {
            let name = account.name.clone();
            app.confirm_message = format!("Delete account '{name}'? Its transactions remain.");
            app.pending_action = Some(PendingAction::DeleteAccount { id, name });
            app.input_mode = InputMode::Confirm;
        }
    }
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name> [income|expense|both]");
        return Ok(());
    }

    let (name, scope) = match args.rsplit_once(' ') {
        Some((rest, last))
            if CategoryScope::all()
                .iter()
                .any(|s| s.as_str() == last.to_lowercase()) =>
        {
            (rest.to_string(), CategoryScope::parse(last))
        }
        _ => (args.to_string(), CategoryScope::Both),
    };

    let cat = Category::new(name.clone(), Icon::Other, scope);
    db.insert_category(&cat)?;
    app.refresh_categories(db)?;
    app.set_status(format!("Created category: {name} ({scope})"));
    Ok(())
}

fn cmd_delete_category(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Categories || app.categories.is_empty() {
        app.set_status("Navigate to Categories and select one first");
        return Ok(());
    }

    if let Some(cat) = app.selected_category() {
        if let Some(id) = cat.id {
            let name = cat.name.clone();
            app.confirm_message = format!("Delete category '{name}'?");
            app.pending_action = Some(PendingAction::DeleteCategory { id, name });
            app.input_mode = InputMode::Confirm;
        }
    }
    Ok(())
}

fn cmd_income(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    record_movement(args, app, db, TransactionKind::Income)
}

fn cmd_expense(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    record_movement(args, app, db, TransactionKind::Expense)
}

/// Shared entry path for `:income` and `:expense`:
/// `[YYYY-MM-DD] <amount> <description>`. The movement lands on the
/// currently selected account.
fn record_movement(
    args: &str,
    app: &mut App,
    db: &mut Database,
    kind: TransactionKind,
) -> anyhow::Result<()> {
    let usage = format!("Usage: :{} [date] <amount> <description>", kind.as_str());
    if args.is_empty() {
        app.set_status(usage);
        return Ok(());
    }

    let mut rest = args;
    let mut datetime = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if let Some((first, tail)) = rest.split_once(' ') {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(first, "%Y-%m-%d") {
            datetime = format!("{} 12:00:00", date.format("%Y-%m-%d"));
            rest = tail;
        }
    }

    let (amount_str, description) = match rest.split_once(' ') {
        Some((a, d)) if !d.trim().is_empty() => (a, d.trim()),
        _ => {
            app.set_status(usage);
            return Ok(());
        }
    };

    let amount_cents = match parse_cents(amount_str) {
        Some(cents) if cents >= 0 => cents,
        _ => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    let account_id = match app.selected_account().and_then(|a| a.id) {
        Some(id) => id,
        None => {
            app.set_status("No account found. Create one with :account <name>");
            return Ok(());
        }
    };
    let account_name = app.account_name(account_id);

    let txn = Transaction {
        id: None,
        account_id,
        target_account_id: None,
        category_id: None,
        description: description.to_string(),
        amount_cents,
        kind,
        datetime,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    db.create_transaction(&txn)?;
    app.refresh_dashboard(db)?;
    app.set_status(format!(
        "{kind}: {description} {} on {account_name}",
        super::util::format_cents(amount_cents)
    ));
    Ok(())
}

fn cmd_transfer(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.splitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status("Usage: :transfer <amount> <target account>");
        return Ok(());
    }

    let amount_cents = match parse_cents(parts[0]) {
        Some(cents) if cents >= 0 => cents,
        _ => {
            app.set_status(format!("Invalid amount: {}", parts[0]));
            return Ok(());
        }
    };

    let source = match app.selected_account().and_then(|a| a.id) {
        Some(id) => id,
        None => {
            app.set_status("No account selected");
            return Ok(());
        }
    };

    let target_name = parts[1].trim();
    let target = match Account::find_by_name(&app.accounts, target_name).and_then(|a| a.id) {
        Some(id) => id,
        None => {
            let names: Vec<&str> = app.accounts.iter().map(|a| a.name.as_str()).collect();
            app.set_status(format!(
                "Account '{target_name}' not found. Available: {}",
                names.join(", ")
            ));
            return Ok(());
        }
    };

    let txn = Transaction {
        id: None,
        account_id: source,
        target_account_id: Some(target),
        category_id: None,
        description: format!("Transfer to {target_name}"),
        amount_cents,
        kind: TransactionKind::Transfer,
        datetime: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    match db.create_transaction(&txn) {
        Ok(_) => {
            app.refresh_dashboard(db)?;
            app.set_status(format!(
                "Transferred {} to {target_name}",
                super::util::format_cents(amount_cents)
            ));
        }
        Err(e) => {
            // Self-transfers and the like are user mistakes, not crashes
            app.set_status(format!("Transfer failed: {e}"));
        }
    }
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.selected_transaction() {
        if let Some(id) = txn.id {
            let desc = txn.description.clone();
            app.confirm_message = format!("Delete '{desc}'?");
            app.pending_action = Some(PendingAction::DeleteTransaction {
                id,
                description: desc,
            });
            app.input_mode = InputMode::Confirm;
        }
    }
    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if args.is_empty() {
        // Enter editing mode for inline rename
        if let Some(txn) = app.selected_transaction() {
            app.command_input = txn.description.clone();
            app.input_mode = InputMode::Editing;
            app.set_status("Type new name, press Enter to confirm");
        }
        return Ok(());
    }

    if let Some(txn) = app.selected_transaction() {
        let mut edited = txn.clone();
        edited.description = args.to_string();
        db.update_transaction(&edited)?;
        app.refresh_transactions(db)?;
        app.set_status(format!("Renamed transaction to: {args}"));
    }
    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }
    if args.is_empty() {
        app.set_status("Usage: :recat <category_name>");
        return Ok(());
    }

    let cat = match Category::find_by_name(&app.categories, args) {
        Some(cat) => cat.clone(),
        None => {
            app.set_status(format!("Category '{args}' not found"));
            return Ok(());
        }
    };

    if let Some(txn) = app.selected_transaction() {
        if !cat.scope.allows(txn.kind) {
            app.set_status(format!(
                "'{}' only applies to {} transactions",
                cat.name, cat.scope
            ));
            return Ok(());
        }
        let mut edited = txn.clone();
        edited.category_id = cat.id;
        db.update_transaction(&edited)?;
        app.refresh_transactions(db)?;
        app.set_status(format!("Categorized as: {}", cat.name));
    }
    Ok(())
}

fn cmd_filter_account(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.transaction_filter_account = None;
        app.screen = Screen::Transactions;
        app.refresh_transactions(db)?;
        app.set_status("Account filter cleared - showing all transactions");
        return Ok(());
    }

    if let Some(account) = Account::find_by_name(&app.accounts, args) {
        app.transaction_filter_account = account.id;
        let name = account.name.clone();
        app.screen = Screen::Transactions;
        app.transaction_index = 0;
        app.transaction_scroll = 0;
        app.refresh_transactions(db)?;
        app.set_status(format!("Filtering by account: {name}"));
    } else {
        let names: Vec<&str> = app.accounts.iter().map(|a| a.name.as_str()).collect();
        app.set_status(format!("Account not found. Available: {}", names.join(", ")));
    }
    Ok(())
}

fn cmd_filter_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.transaction_filter_category = None;
        app.screen = Screen::Transactions;
        app.refresh_transactions(db)?;
        app.set_status("Category filter cleared");
        return Ok(());
    }

    if let Some(cat) = Category::find_by_name(&app.categories, args) {
        app.transaction_filter_category = cat.id;
        let name = cat.name.clone();
        app.screen = Screen::Transactions;
        app.transaction_index = 0;
        app.transaction_scroll = 0;
        app.refresh_transactions(db)?;
        app.set_status(format!("Filtering by category: {name}"));
    } else {
        app.set_status(format!("Category '{args}' not found"));
    }
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.search_debounce.cancel();
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }
    Ok(())
}

fn cmd_view(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.toggle_view_mode(db)
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/platasync-export-{}.csv", app.range_preset().as_str())
    } else {
        crate::run::shellexpand(args)
    };

    let count = db.export_to_csv(&path, Some(&app.range))?;
    if count == 0 {
        app.set_status("No transactions to export");
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}
