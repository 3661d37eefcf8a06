// src/models/customer.rs
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CustomerId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId, // Row id in the customers table
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Customer {}, {}>", self.id, self.name)
    }
}
