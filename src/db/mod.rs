mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::ledger;
use crate::ledger::daterange::DateRange;
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults: &[(&str, Icon, CategoryScope)] = &[
            ("Salary", Icon::Bank, CategoryScope::Income),
            ("Freelance", Icon::Wallet, CategoryScope::Income),
            ("Interest", Icon::PiggyBank, CategoryScope::Income),
            ("Gifts", Icon::Fun, CategoryScope::Both),
            ("Groceries", Icon::Cart, CategoryScope::Expense),
            ("Rent", Icon::Home, CategoryScope::Expense),
            ("Utilities", Icon::Home, CategoryScope::Expense),
            ("Dining Out", Icon::Food, CategoryScope::Expense),
            ("Transport", Icon::Transport, CategoryScope::Expense),
            ("Health", Icon::Health, CategoryScope::Expense),
            ("Entertainment", Icon::Fun, CategoryScope::Expense),
            ("Shopping", Icon::Cart, CategoryScope::Expense),
            ("Other", Icon::Other, CategoryScope::Both),
        ];

        let tx = self.conn.transaction()?;
        for (name, icon, scope) in defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, icon, scope) VALUES (?1, ?2, ?3)",
                params![name, icon.as_str(), scope.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Accounts ──────────────────────────────────────────────

    pub(crate) fn insert_account(&self, account: &Account) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO accounts (name, icon, balance_cents, created_at, last_used_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.name,
                account.icon.as_str(),
                account.balance_cents,
                account.created_at,
                account.last_used_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, balance_cents, created_at, last_used_at
             FROM accounts ORDER BY name",
        )?;
        let rows = stmt.query_map([], row_to_account)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        let result = self.conn.query_row(
            "SELECT id, name, icon, balance_cents, created_at, last_used_at
             FROM accounts WHERE id = ?1",
            params![id],
            row_to_account,
        );
        match result {
            Ok(a) => Ok(Some(a)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename an account or change its icon. The balance column is off
    /// limits here; only reconciled transaction operations touch it.
    pub(crate) fn update_account_profile(&self, id: i64, name: &str, icon: Icon) -> Result<()> {
        self.conn.execute(
            "UPDATE accounts SET name = ?1, icon = ?2 WHERE id = ?3",
            params![name, icon.as_str(), id],
        )?;
        Ok(())
    }

    /// Deleting an account leaves its transactions in place; cascading is
    /// not implemented.
    pub(crate) fn delete_account(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, icon, scope) VALUES (?1, ?2, ?3)",
            params![cat.name, cat.icon.as_str(), cat.scope.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, icon, scope FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name, icon, scope FROM categories WHERE id = ?1",
            params![id],
            row_to_category,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn delete_category(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Record a transaction and adjust the affected account balances, all
    /// inside one storage transaction so a crash cannot separate the two
    /// writes.
    pub(crate) fn create_transaction(&mut self, txn: &Transaction) -> Result<i64> {
        let changes = ledger::changes_for_create(txn)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transactions (account_id, target_account_id, category_id, description,
                                       amount_cents, kind, datetime, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                txn.account_id,
                txn.target_account_id,
                txn.category_id,
                txn.description,
                txn.amount_cents,
                txn.kind.as_str(),
                txn.datetime,
                txn.created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        apply_balance_changes(&tx, &changes)?;
        tx.commit()?;
        Ok(id)
    }

    /// Replace a stored transaction with an edited version, reconciling the
    /// balance difference in the same storage transaction. A missing id is a
    /// silent no-op.
    pub(crate) fn update_transaction(&mut self, txn: &Transaction) -> Result<()> {
        let id = match txn.id {
            Some(id) => id,
            None => return Ok(()),
        };
        let old = match self.get_transaction_by_id(id)? {
            Some(old) => old,
            None => return Ok(()),
        };
        let changes = ledger::changes_for_edit(&old, txn)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE transactions SET account_id = ?1, target_account_id = ?2, category_id = ?3,
                                     description = ?4, amount_cents = ?5, kind = ?6, datetime = ?7
             WHERE id = ?8",
            params![
                txn.account_id,
                txn.target_account_id,
                txn.category_id,
                txn.description,
                txn.amount_cents,
                txn.kind.as_str(),
                txn.datetime,
                id,
            ],
        )?;
        apply_balance_changes(&tx, &changes)?;
        tx.commit()?;
        Ok(())
    }

    /// Remove a transaction and restore the affected balances by applying
    /// the inverse deltas. Unknown ids are a silent no-op, as are balance
    /// updates against accounts that no longer exist.
    pub(crate) fn delete_transaction(&mut self, id: i64) -> Result<()> {
        let txn = match self.get_transaction_by_id(id)? {
            Some(txn) => txn,
            None => return Ok(()),
        };
        let changes = ledger::changes_for_delete(&txn);

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        apply_balance_changes(&tx, &changes)?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, account_id, target_account_id, category_id, description,
                    amount_cents, kind, datetime, created_at
             FROM transactions WHERE id = ?1",
            params![id],
            row_to_transaction,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transactions(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        account_id: Option<i64>,
        category_id: Option<i64>,
        search: Option<&str>,
        range: Option<&DateRange>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT t.id, t.account_id, t.target_account_id, t.category_id, t.description,
                    t.amount_cents, t.kind, t.datetime, t.created_at
             FROM transactions t WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(aid) = account_id {
            sql.push_str(&format!(
                " AND (t.account_id = ?{0} OR t.target_account_id = ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(aid));
        }
        if let Some(cid) = category_id {
            sql.push_str(&format!(" AND t.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(s) = search {
            sql.push_str(&format!(
                " AND t.description LIKE ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }
        if let Some(r) = range {
            sql.push_str(&format!(
                " AND date(t.datetime) BETWEEN ?{} AND ?{}",
                param_values.len() + 1,
                param_values.len() + 2
            ));
            param_values.push(Box::new(r.from.format("%Y-%m-%d").to_string()));
            param_values.push(Box::new(r.to.format("%Y-%m-%d").to_string()));
        }

        sql.push_str(" ORDER BY t.datetime DESC, t.id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        if let Some(o) = offset {
            sql.push_str(&format!(" OFFSET {o}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    pub(crate) fn export_to_csv(&self, path: &str, range: Option<&DateRange>) -> Result<usize> {
        let txns = self.get_transactions(None, None, None, None, None, range)?;
        if txns.is_empty() {
            return Ok(0);
        }

        let accounts = self.get_accounts()?;
        let categories = self.get_categories()?;
        let account_name = |id: i64| {
            Account::find_by_id(&accounts, id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "(deleted)".into())
        };

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        writer.write_record([
            "datetime",
            "kind",
            "description",
            "amount",
            "account",
            "target_account",
            "category",
        ])?;

        for txn in &txns {
            let amount = format!("{}.{:02}", txn.amount_cents / 100, txn.amount_cents % 100);
            let target = txn.target_account_id.map(account_name).unwrap_or_default();
            let category = txn
                .category_id
                .and_then(|id| Category::find_by_id(&categories, id))
                .map(|c| c.name.clone())
                .unwrap_or_default();
            writer.write_record([
                txn.datetime.as_str(),
                txn.kind.as_str(),
                txn.description.as_str(),
                amount.as_str(),
                account_name(txn.account_id).as_str(),
                target.as_str(),
                category.as_str(),
            ])?;
        }
        writer.flush()?;
        Ok(txns.len())
    }
}

/// Apply reconciler deltas inside an open storage transaction. An account
/// that no longer exists matches zero rows and is skipped silently.
fn apply_balance_changes(
    tx: &rusqlite::Transaction<'_>,
    changes: &[ledger::BalanceChange],
) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    for change in changes {
        tx.execute(
            "UPDATE accounts SET balance_cents = balance_cents + ?1, last_used_at = ?2
             WHERE id = ?3",
            params![change.delta_cents, now, change.account_id],
        )?;
    }
    Ok(())
}

// ── Row mappers ───────────────────────────────────────────────

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        icon: Icon::parse(&row.get::<_, String>(2)?),
        balance_cents: row.get(3)?,
        created_at: row.get(4)?,
        last_used_at: row.get(5)?,
    })
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        icon: Icon::parse(&row.get::<_, String>(2)?),
        scope: CategoryScope::parse(&row.get::<_, String>(3)?),
    })
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        account_id: row.get(1)?,
        target_account_id: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        amount_cents: row.get(5)?,
        kind: TransactionKind::parse(&row.get::<_, String>(6)?),
        datetime: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests;
