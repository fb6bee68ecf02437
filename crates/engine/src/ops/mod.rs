//! The operations layer. `Engine` holds the database handle and exposes one
//! method per API operation; submodules group them by resource.

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod balances;
mod budgets;
mod categories;
mod dashboard;
mod transactions;
mod users;

pub use dashboard::{CategoryExpense, DashboardData, MonthlySummary};
pub use transactions::TransactionListFilter;

/// Runs the body inside a database transaction. Commits on `Ok`; an `Err`
/// drops the transaction, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        if result.is_ok() {
            $tx.commit().await?;
        }
        result
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Assembles an [`Engine`] from its parts.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    #[must_use]
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

/// Trims a user-supplied name, rejecting empty results with the label in the
/// message.
fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
