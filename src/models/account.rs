/// Icon tag attached to accounts and categories. Purely a stable identifier;
/// the glyph each tag renders as lives in `ui::theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Wallet,
    Bank,
    Card,
    Cash,
    PiggyBank,
    Cart,
    Home,
    Food,
    Transport,
    Health,
    Fun,
    Other,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Bank => "bank",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::PiggyBank => "piggy",
            Self::Cart => "cart",
            Self::Home => "home",
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Health => "health",
            Self::Fun => "fun",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "wallet" => Self::Wallet,
            "bank" => Self::Bank,
            "card" | "credit" => Self::Card,
            "cash" => Self::Cash,
            "piggy" | "piggybank" | "savings" => Self::PiggyBank,
            "cart" | "shopping" => Self::Cart,
            "home" => Self::Home,
            "food" => Self::Food,
            "transport" | "car" => Self::Transport,
            "health" => Self::Health,
            "fun" | "entertainment" => Self::Fun,
            _ => Self::Other,
        }
    }

    pub fn all() -> &'static [Icon] {
        &[
            Self::Wallet,
            Self::Bank,
            Self::Card,
            Self::Cash,
            Self::PiggyBank,
            Self::Cart,
            Self::Home,
            Self::Food,
            Self::Transport,
            Self::Health,
            Self::Fun,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: Option<i64>,
    pub name: String,
    pub icon: Icon,
    /// Current balance in cents. Written only by reconciled transaction
    /// operations after the account is created.
    pub balance_cents: i64,
    pub created_at: String,
    pub last_used_at: String,
}

impl Account {
    pub fn new(name: String, icon: Icon, initial_balance_cents: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            name,
            icon,
            balance_cents: initial_balance_cents,
            created_at: now.clone(),
            last_used_at: now,
        }
    }

    pub fn find_by_name<'a>(accounts: &'a [Account], name: &str) -> Option<&'a Account> {
        accounts
            .iter()
            .find(|a| a.name.to_lowercase() == name.to_lowercase())
    }

    pub fn find_by_id(accounts: &[Account], id: i64) -> Option<&Account> {
        accounts.iter().find(|a| a.id == Some(id))
    }
}
