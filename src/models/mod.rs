pub mod customer;
pub mod item;
pub mod review;

pub use customer::{Customer, CustomerId, NewCustomer};
pub use item::{Item, ItemId, NewItem};
pub use review::{NewReview, Review, ReviewId};
