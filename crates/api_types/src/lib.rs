use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a money movement.
///
/// Categories carry the same tag to say which kind of transactions they
/// classify. Serialized as `"income"` / `"expense"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Returns the canonical string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
    }

    /// Response for both register (201) and login (200).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub user: UserView,
    }

    /// The profile payload additionally reports when the account was created.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileResponse {
        pub user: ProfileView,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub created_at: DateTime<Utc>,
    }

    /// Query string for `GET /categories`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryResponse {
        pub category: CategoryView,
    }
}

pub mod transaction {
    use super::*;

    /// Request body for create and update (full replacement, like the form).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Must be > 0; the sign is carried by `type`.
        pub amount: Decimal,
        /// Calendar date of the movement (`YYYY-MM-DD`).
        pub date: NaiveDate,
        pub category_id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount: Decimal,
        pub date: NaiveDate,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub description: Option<String>,
        pub category_id: Uuid,
        /// Name of the referenced category, joined in for display.
        pub category_name: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Query string for `GET /transactions`.
    ///
    /// `month` only narrows the list when `year` is present too.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionResponse {
        pub transaction: TransactionView,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        /// Must be > 0.
        pub amount: Decimal,
        pub month: u32,
        pub year: i32,
        /// Absent for an overall (all-categories) budget.
        pub category_id: Option<Uuid>,
    }

    /// A budget with its read-time status fields.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub amount: Decimal,
        pub month: u32,
        pub year: i32,
        pub category_id: Option<Uuid>,
        pub category_name: Option<String>,
        /// Expense total for the budget's own month (and category, if set).
        pub spent: Decimal,
        pub remaining: Decimal,
        /// `100 * spent / amount`; 0 when `amount` is 0. May exceed 100.
        pub percentage: f64,
        pub created_at: DateTime<Utc>,
    }

    /// Query string for `GET /budgets`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetListQuery {
        pub month: Option<u32>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetResponse {
        pub budget: BudgetView,
    }
}

pub mod solde {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SoldeView {
        pub initial_balance: Decimal,
        pub current_balance: Decimal,
    }

    /// Request body for `PUT /solde/initial`. Negative values are allowed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InitialBalanceUpdate {
        pub initial_balance: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SoldeResponse {
        pub solde: SoldeView,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryExpense {
        pub category: String,
        pub amount: Decimal,
    }

    /// One point of the trailing six-month series.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyPoint {
        /// English three-letter month name ("Jan".."Dec").
        pub month: String,
        pub year: i32,
        pub income: Decimal,
        pub expense: Decimal,
    }

    /// Aggregate payload for `GET /dashboard`.
    ///
    /// Top-level keys are camelCase; nested rows keep the entity field names.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardResponse {
        /// The solde `current_balance`.
        pub balance: Decimal,
        pub initial_balance: Decimal,
        pub total_income: Decimal,
        pub total_expense: Decimal,
        pub monthly_income: Decimal,
        pub monthly_expense: Decimal,
        /// Current-month expenses grouped by category, descending by amount.
        pub expenses_by_category: Vec<CategoryExpense>,
        /// Oldest first; the last entry is the current month.
        pub monthly_evolution: Vec<MonthlyPoint>,
        pub recent_transactions: Vec<transaction::TransactionView>,
        /// Category-scoped budgets of the current month with their status.
        pub category_budgets: Vec<budget::BudgetView>,
        pub current_month: u32,
        pub current_year: i32,
    }
}
