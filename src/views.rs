//! Outbound shapes for customers, items and reviews.
//!
//! Each view nests its neighbours one level deep and never points back at the
//! record it hangs off, so serializing a customer cannot loop through its
//! reviews into the same customer again.

use crate::models::{Customer, CustomerId, Item, ItemId, Review, ReviewId};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
}

/// A review with both ends attached; neither end lists its own reviews.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer_id: CustomerId,
    pub item_id: ItemId,
    pub customer: CustomerSummary,
    pub item: ItemSummary,
}

/// A review as seen from its customer: the customer itself is left out.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CustomerReviewView {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer_id: CustomerId,
    pub item_id: ItemId,
    pub item: ItemSummary,
}

/// A review as seen from its item: the item itself is left out.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ItemReviewView {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer_id: CustomerId,
    pub item_id: ItemId,
    pub customer: CustomerSummary,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    pub reviews: Vec<CustomerReviewView>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub reviews: Vec<ItemReviewView>,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        CustomerSummary {
            id: customer.id,
            name: customer.name,
        }
    }
}

impl From<Item> for ItemSummary {
    fn from(item: Item) -> Self {
        ItemSummary {
            id: item.id,
            name: item.name,
            price: item.price,
        }
    }
}

impl ReviewView {
    pub fn new(review: Review, customer: Customer, item: Item) -> Self {
        ReviewView {
            id: review.id,
            comment: review.comment,
            customer_id: review.customer_id,
            item_id: review.item_id,
            customer: customer.into(),
            item: item.into(),
        }
    }
}

impl CustomerView {
    pub fn new(customer: Customer, reviews: Vec<(Review, Item)>) -> Self {
        let reviews = reviews
            .into_iter()
            .map(|(review, item)| CustomerReviewView {
                id: review.id,
                comment: review.comment,
                customer_id: review.customer_id,
                item_id: review.item_id,
                item: item.into(),
            })
            .collect();
        CustomerView {
            id: customer.id,
            name: customer.name,
            reviews,
        }
    }
}

impl ItemView {
    pub fn new(item: Item, reviews: Vec<(Review, Customer)>) -> Self {
        let reviews = reviews
            .into_iter()
            .map(|(review, customer)| ItemReviewView {
                id: review.id,
                comment: review.comment,
                customer_id: review.customer_id,
                item_id: review.item_id,
                customer: customer.into(),
            })
            .collect();
        ItemView {
            id: item.id,
            name: item.name,
            price: item.price,
            reviews,
        }
    }
}
