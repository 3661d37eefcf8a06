pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod telemetry;
pub mod views;

#[cfg(feature = "ssr")]
pub mod api;

pub use db::Database;
pub use error::{Result, StoreError};
pub use schema::DeletePolicy;
