// src/models/review.rs
use super::{CustomerId, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ReviewId = i64;

/// A review is the join row between one customer and one item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub comment: Option<String>,  // Absent when created through an association view
    pub customer_id: CustomerId,  // Customer who wrote the review
    pub item_id: ItemId,          // Item the review is about
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewReview {
    pub customer_id: CustomerId,
    pub item_id: ItemId,
    #[serde(default)]
    pub comment: Option<String>,
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Review {}, customer {}, item {}>",
            self.id, self.customer_id, self.item_id
        )
    }
}
