mod account;
mod category;
mod setting;
mod transaction;

pub use account::{Account, Icon};
pub use category::{Category, CategoryScope};
pub use setting::{view_mode_key, ViewMode};
pub use transaction::{Transaction, TransactionKind};
