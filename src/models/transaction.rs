#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "income" => Self::Income,
            "transfer" => Self::Transfer,
            _ => Self::Expense,
        }
    }

    pub fn all() -> &'static [TransactionKind] {
        &[Self::Income, Self::Expense, Self::Transfer]
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A recorded money movement. Immutable once written; edits go through the
/// reconciler as retract-old + apply-new.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub account_id: i64,
    /// Set for transfers only; the receiving account.
    pub target_account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub description: String,
    /// Always non-negative; direction comes from `kind`.
    pub amount_cents: i64,
    pub kind: TransactionKind,
    /// When the movement happened, "YYYY-MM-DD HH:MM:SS" local time.
    pub datetime: String,
    pub created_at: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }

    /// The amount as it affects the source account's balance.
    pub fn signed_amount_cents(&self) -> i64 {
        match self.kind {
            TransactionKind::Income => self.amount_cents,
            TransactionKind::Expense | TransactionKind::Transfer => -self.amount_cents,
        }
    }

    /// The calendar day portion of `datetime`.
    pub fn date(&self) -> &str {
        self.datetime.split(' ').next().unwrap_or(&self.datetime)
    }
}
