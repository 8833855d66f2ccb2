use anyhow::Result;
use chrono::NaiveDate;
use std::time::Duration;

use crate::db::Database;
use crate::ledger::daterange::{DateRange, RangePreset};
use crate::ledger::stats::PeriodStats;
use crate::models::*;
use crate::ui::util::Debouncer;

/// How long a pause in search typing must last before the query re-runs.
pub(crate) const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Accounts,
    Transactions,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Accounts,
            Self::Transactions,
            Self::Categories,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Accounts => write!(f, "Accounts"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteAccount { id: i64, name: String },
    DeleteCategory { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) search_debounce: Debouncer,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// Reference day the range presets resolve against.
    pub(crate) today: NaiveDate,
    pub(crate) range: DateRange,

    // Dashboard
    pub(crate) stats: PeriodStats,

    // Accounts
    pub(crate) accounts: Vec<Account>,
    pub(crate) account_index: usize,
    pub(crate) account_scroll: usize,
    pub(crate) accounts_view: ViewMode,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) transaction_filter_account: Option<i64>,
    pub(crate) transaction_filter_category: Option<i64>,
    pub(crate) transaction_count: i64,

    // Categories
    pub(crate) categories: Vec<Category>,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,
    pub(crate) categories_view: ViewMode,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        let today = chrono::Local::now().date_naive();

        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            status_message: String::new(),
            show_help: false,

            today,
            range: RangePreset::ThisMonth.resolve(today),

            stats: PeriodStats::default(),

            accounts: Vec::new(),
            account_index: 0,
            account_scroll: 0,
            accounts_view: ViewMode::List,

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            transaction_filter_account: None,
            transaction_filter_category: None,
            transaction_count: 0,

            categories: Vec::new(),
            category_index: 0,
            category_scroll: 0,
            categories_view: ViewMode::List,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// The preset the current range corresponds to, defaulting to Today.
    pub(crate) fn range_preset(&self) -> RangePreset {
        self.range.preset_or_default(self.today)
    }

    pub(crate) fn set_range(&mut self, db: &Database, preset: RangePreset) -> Result<()> {
        self.range = preset.resolve(self.today);
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh_dashboard(db)?;
        Ok(())
    }

    pub(crate) fn load_view_modes(&mut self, db: &Database) -> Result<()> {
        self.accounts_view = db
            .get_setting(&view_mode_key("Accounts"))?
            .map(|v| ViewMode::parse(&v))
            .unwrap_or_default();
        self.categories_view = db
            .get_setting(&view_mode_key("Categories"))?
            .map(|v| ViewMode::parse(&v))
            .unwrap_or_default();
        Ok(())
    }

    /// Toggle list/grid for the current screen and persist the choice.
    pub(crate) fn toggle_view_mode(&mut self, db: &Database) -> Result<()> {
        let (key, mode) = match self.screen {
            Screen::Accounts => {
                self.accounts_view = self.accounts_view.toggled();
                (view_mode_key("Accounts"), self.accounts_view)
            }
            Screen::Categories => {
                self.categories_view = self.categories_view.toggled();
                (view_mode_key("Categories"), self.categories_view)
            }
            _ => {
                self.set_status("View mode applies to Accounts and Categories");
                return Ok(());
            }
        };
        db.set_setting(&key, mode.as_str())?;
        self.set_status(format!("{} view: {mode}", self.screen));
        Ok(())
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let period_txns = db.get_transactions(None, None, None, None, None, Some(&self.range))?;
        self.stats = PeriodStats::compute(&period_txns);
        self.refresh_accounts(db)?;
        self.refresh_transactions(db)?;
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        self.transactions = db.get_transactions(
            Some(200),
            None,
            self.transaction_filter_account,
            self.transaction_filter_category,
            search,
            Some(&self.range),
        )?;
        self.transaction_count = db.get_transaction_count()?;
        if self.transaction_index >= self.transactions.len() && !self.transactions.is_empty() {
            self.transaction_index = self.transactions.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_accounts(&mut self, db: &Database) -> Result<()> {
        self.accounts = db.get_accounts()?;
        if self.account_index >= self.accounts.len() && !self.accounts.is_empty() {
            self.account_index = self.accounts.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        if self.category_index >= self.categories.len() && !self.categories.is_empty() {
            self.category_index = self.categories.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?; // also refreshes accounts and transactions
        self.refresh_categories(db)?;
        Ok(())
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn selected_account(&self) -> Option<&Account> {
        self.accounts.get(self.account_index)
    }

    pub(crate) fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.category_index)
    }

    /// Total balance across all accounts, in cents.
    pub(crate) fn total_balance_cents(&self) -> i64 {
        self.accounts.iter().map(|a| a.balance_cents).sum()
    }

    pub(crate) fn account_name(&self, id: i64) -> String {
        Account::find_by_id(&self.accounts, id)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "(deleted)".into())
    }

    pub(crate) fn category_name(&self, id: Option<i64>) -> String {
        id.and_then(|id| Category::find_by_id(&self.categories, id))
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
