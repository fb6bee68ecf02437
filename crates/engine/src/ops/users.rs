use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, TransactionKind, User, categories, solde, users,
};

use super::{Engine, normalize_required_name, with_tx};

/// Categories seeded for every new account, in insertion order.
const DEFAULT_CATEGORIES: [(&str, TransactionKind); 13] = [
    ("Food & Dining", TransactionKind::Expense),
    ("Transportation", TransactionKind::Expense),
    ("Shopping", TransactionKind::Expense),
    ("Entertainment", TransactionKind::Expense),
    ("Bills & Utilities", TransactionKind::Expense),
    ("Health & Fitness", TransactionKind::Expense),
    ("Travel", TransactionKind::Expense),
    ("Education", TransactionKind::Expense),
    ("Other Expense", TransactionKind::Expense),
    ("Salary", TransactionKind::Income),
    ("Freelance", TransactionKind::Income),
    ("Investments", TransactionKind::Income),
    ("Other Income", TransactionKind::Income),
];

impl Engine {
    /// Creates an account and seeds it with the default categories and a zero
    /// balance row, all in one transaction.
    ///
    /// `password_hash` must already be hashed; the engine stores it verbatim.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> ResultEngine<User> {
        let name = normalize_required_name(name, "user")?;
        let email = email.trim().to_string();
        let now = Utc::now();
        let user_id = Uuid::new_v4();

        with_tx!(self, |db_tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(
                    "User with this email".to_string(),
                ));
            }

            let user = users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name.clone()),
                email: ActiveValue::Set(email.clone()),
                password: ActiveValue::Set(password_hash.to_string()),
                created_at: ActiveValue::Set(now),
            };
            user.insert(&db_tx).await?;

            for (category_name, kind) in DEFAULT_CATEGORIES {
                let category = categories::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4().to_string()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    name: ActiveValue::Set(category_name.to_string()),
                    kind: ActiveValue::Set(kind.as_str().to_string()),
                    created_at: ActiveValue::Set(now),
                };
                category.insert(&db_tx).await?;
            }

            let balance = solde::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                initial_balance: ActiveValue::Set(Decimal::ZERO),
                current_balance: ActiveValue::Set(Decimal::ZERO),
            };
            balance.insert(&db_tx).await?;

            Ok(User {
                id: user_id,
                name,
                email,
                created_at: now,
            })
        })
    }
}
