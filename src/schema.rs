//! Table layout and constraint naming for the customers/items/reviews schema.
//!
//! Foreign keys are named `fk_<table>_<column>_<referred_table>` so that the
//! generated DDL is stable across runs.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TABLE_CUSTOMERS: &str = "customers";
pub const TABLE_ITEMS: &str = "items";
pub const TABLE_REVIEWS: &str = "reviews";

/// Builds a foreign-key constraint name from the owning table, the
/// referencing column and the referred table.
pub fn foreign_key_name(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{}_{}_{}", table, column, referred_table)
}

/// What happens to reviews when their customer or item is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse to delete a customer or item that still has reviews.
    #[default]
    Restrict,
    /// Delete the dependent reviews together with their parent.
    Cascade,
}

impl DeletePolicy {
    fn as_sql(self) -> &'static str {
        match self {
            DeletePolicy::Restrict => "ON DELETE RESTRICT",
            DeletePolicy::Cascade => "ON DELETE CASCADE",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletePolicy::Restrict => write!(f, "restrict"),
            DeletePolicy::Cascade => write!(f, "cascade"),
        }
    }
}

impl FromStr for DeletePolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => Err(StoreError::Config(format!(
                "unknown delete policy '{}', expected 'restrict' or 'cascade'",
                other
            ))),
        }
    }
}

/// Reads the delete policy back out of a stored `reviews` table definition.
/// A table without an `ON DELETE CASCADE` clause rejects parent deletes, so
/// anything else counts as `Restrict`.
pub fn policy_from_ddl(ddl: &str) -> DeletePolicy {
    let normalized = ddl.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.to_ascii_uppercase().contains("ON DELETE CASCADE") {
        DeletePolicy::Cascade
    } else {
        DeletePolicy::Restrict
    }
}

/// DDL for all three tables and the review lookup indexes, in creation order.
pub fn create_statements(policy: DeletePolicy) -> Vec<String> {
    let on_delete = policy.as_sql();
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {customers} (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );",
            customers = TABLE_CUSTOMERS
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {items} (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                price REAL NOT NULL
            );",
            items = TABLE_ITEMS
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {reviews} (
                id INTEGER PRIMARY KEY,
                comment TEXT,
                customer_id INTEGER NOT NULL,
                item_id INTEGER NOT NULL,
                CONSTRAINT {fk_customer} FOREIGN KEY (customer_id)
                    REFERENCES {customers}(id) {on_delete},
                CONSTRAINT {fk_item} FOREIGN KEY (item_id)
                    REFERENCES {items}(id) {on_delete}
            );",
            reviews = TABLE_REVIEWS,
            customers = TABLE_CUSTOMERS,
            items = TABLE_ITEMS,
            fk_customer = foreign_key_name(TABLE_REVIEWS, "customer_id", TABLE_CUSTOMERS),
            fk_item = foreign_key_name(TABLE_REVIEWS, "item_id", TABLE_ITEMS),
            on_delete = on_delete,
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS ix_{reviews}_customer_id ON {reviews} (customer_id);",
            reviews = TABLE_REVIEWS
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS ix_{reviews}_item_id ON {reviews} (item_id);",
            reviews = TABLE_REVIEWS
        ),
    ]
}
