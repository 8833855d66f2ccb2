use super::account::Icon;
use super::transaction::TransactionKind;

/// Which transaction kinds a category may classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    Income,
    Expense,
    Both,
}

impl CategoryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "income" => Self::Income,
            "expense" => Self::Expense,
            _ => Self::Both,
        }
    }

    pub fn all() -> &'static [CategoryScope] {
        &[Self::Income, Self::Expense, Self::Both]
    }

    pub fn allows(&self, kind: TransactionKind) -> bool {
        match self {
            Self::Both => matches!(
                kind,
                TransactionKind::Income | TransactionKind::Expense
            ),
            Self::Income => kind == TransactionKind::Income,
            Self::Expense => kind == TransactionKind::Expense,
        }
    }
}

impl std::fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub icon: Icon,
    pub scope: CategoryScope,
}

impl Category {
    pub fn new(name: String, icon: Icon, scope: CategoryScope) -> Self {
        Self {
            id: None,
            name,
            icon,
            scope,
        }
    }

    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
    }

    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
