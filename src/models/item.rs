use serde::{Deserialize, Serialize};
use std::fmt;

pub type ItemId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,     // Row id in the items table
    pub name: String,   // Item name
    pub price: f64,     // Unit price, no currency attached
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Item {}, {}, {}>", self.id, self.name, self.price)
    }
}
