//! Balance reconciliation: keeps each account's stored balance consistent
//! with the net effect of the transactions touching it, as an incremental
//! update rather than a history replay. Deltas are plain cent additions, so
//! retracting a transaction is the exact inverse of applying it regardless
//! of what was recorded in between.

pub(crate) mod daterange;
pub(crate) mod stats;

use anyhow::Result;

use crate::models::{Transaction, TransactionKind};

/// A single account's balance adjustment, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BalanceChange {
    pub(crate) account_id: i64,
    pub(crate) delta_cents: i64,
}

/// Check the record invariants before it is applied.
/// Negative resulting balances are deliberately not rejected here.
pub(crate) fn validate(txn: &Transaction) -> Result<()> {
    if txn.amount_cents < 0 {
        anyhow::bail!("amount must not be negative");
    }
    match txn.kind {
        TransactionKind::Transfer => {
            let target = match txn.target_account_id {
                Some(t) => t,
                None => anyhow::bail!("transfer requires a target account"),
            };
            if target == txn.account_id {
                anyhow::bail!("transfer target must differ from the source account");
            }
        }
        TransactionKind::Income | TransactionKind::Expense => {
            if txn.target_account_id.is_some() {
                anyhow::bail!("only transfers may have a target account");
            }
        }
    }
    Ok(())
}

/// Balance deltas implied by recording `txn`.
/// Income adds to the source, expense subtracts, a transfer subtracts from
/// the source and adds to the target.
pub(crate) fn changes_for_create(txn: &Transaction) -> Result<Vec<BalanceChange>> {
    validate(txn)?;
    let mut changes = vec![BalanceChange {
        account_id: txn.account_id,
        delta_cents: txn.signed_amount_cents(),
    }];
    if let Some(target) = txn.target_account_id {
        changes.push(BalanceChange {
            account_id: target,
            delta_cents: txn.amount_cents,
        });
    }
    Ok(changes)
}

/// Balance deltas that undo a previously recorded `txn`.
pub(crate) fn changes_for_delete(txn: &Transaction) -> Vec<BalanceChange> {
    let mut changes = vec![BalanceChange {
        account_id: txn.account_id,
        delta_cents: -txn.signed_amount_cents(),
    }];
    if let Some(target) = txn.target_account_id {
        changes.push(BalanceChange {
            account_id: target,
            delta_cents: -txn.amount_cents,
        });
    }
    changes
}

/// Balance deltas for replacing `old` with `new`, merged per account so each
/// account is adjusted at most once.
pub(crate) fn changes_for_edit(old: &Transaction, new: &Transaction) -> Result<Vec<BalanceChange>> {
    let mut changes = changes_for_delete(old);
    changes.extend(changes_for_create(new)?);
    Ok(merge(changes))
}

fn merge(changes: Vec<BalanceChange>) -> Vec<BalanceChange> {
    let mut merged: Vec<BalanceChange> = Vec::new();
    for change in changes {
        match merged.iter_mut().find(|c| c.account_id == change.account_id) {
            Some(existing) => existing.delta_cents += change.delta_cents,
            None => merged.push(change),
        }
    }
    merged.retain(|c| c.delta_cents != 0);
    merged
}

#[cfg(test)]
mod tests;
