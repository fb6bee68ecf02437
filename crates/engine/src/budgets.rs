//! Budget primitives.
//!
//! A `Budget` caps spending for one month, either overall (`category_id` is
//! `None`) or for a single category. `spent`, `remaining` and `percentage`
//! are never stored; they are derived at read time into a [`BudgetStatus`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<Uuid>,
    /// Name of the referenced category, filled by list/get joins.
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A budget enriched with the actual spending of its month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// `100 * spent / amount`, or 0 when `amount` is 0. Not capped at 100.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category_id = model
            .category_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| EngineError::KeyNotFound("Category".to_string()))?;
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("Budget".to_string()))?,
            amount: model.amount,
            month: model.month,
            year: model.year,
            category_id,
            category_name: None,
            created_at: model.created_at,
        })
    }
}
