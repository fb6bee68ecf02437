pub use budgets::{Budget, BudgetStatus};
pub use categories::Category;
pub use commands::{BudgetDraft, TransactionDraft};
pub use error::EngineError;
pub use ops::{
    CategoryExpense, DashboardData, Engine, EngineBuilder, MonthlySummary, TransactionListFilter,
};
pub use solde::Solde;
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

mod budgets;
mod categories;
mod commands;
mod error;
mod ops;
mod solde;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
