use crate::error::{Result, StoreError};
use crate::models::{
    Customer, CustomerId, Item, ItemId, NewCustomer, NewItem, Review, ReviewId,
};
use crate::schema::{self, DeletePolicy};
use crate::views::{CustomerView, ItemView, ReviewView};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};


/// Number of rows per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub customers: i64,
    pub items: i64,
    pub reviews: i64,
}

// Define a struct to represent a database connection
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Open (or create) a database file and turn on foreign key enforcement
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(&conn)?;
        info!(path = db_path, "database connection established");
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // SQLite leaves foreign keys off unless asked, per connection
    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Creates the three tables if they are missing and returns the delete
    /// policy the stored review foreign keys actually enforce. The requested
    /// policy only lands on a fresh database; an existing `reviews` table
    /// keeps whatever it was created with.
    pub async fn create_schema(&self, policy: DeletePolicy) -> Result<DeletePolicy> {
        let conn = self.conn.lock().await;
        for statement in schema::create_statements(policy) {
            conn.execute_batch(&statement)?;
        }
        let ddl: String = conn.query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?",
            [schema::TABLE_REVIEWS],
            |row| row.get(0),
        )?;
        let effective = schema::policy_from_ddl(&ddl);
        if effective != policy {
            warn!(
                requested = %policy,
                effective = %effective,
                "existing reviews table keeps its delete policy"
            );
        }
        info!(on_delete = %effective, "schema ready");
        Ok(effective)
    }

    pub async fn row_counts(&self) -> Result<RowCounts> {
        let conn = self.conn.lock().await;
        let count = |table: &str| -> Result<i64> {
            let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        };
        Ok(RowCounts {
            customers: count(schema::TABLE_CUSTOMERS)?,
            items: count(schema::TABLE_ITEMS)?,
            reviews: count(schema::TABLE_REVIEWS)?,
        })
    }

    // Customers

    pub async fn insert_customer(&self, new: &NewCustomer) -> Result<Customer> {
        let conn = self.conn.lock().await;
        conn.execute("INSERT INTO customers (name) VALUES (?)", [&new.name])?;
        let id = conn.last_insert_rowid();
        debug!(customer_id = id, "customer inserted");
        Ok(Customer {
            id,
            name: new.name.clone(),
        })
    }

    pub async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let conn = self.conn.lock().await;
        Ok(fetch_customer(&conn, id)?)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name FROM customers ORDER BY id")?;
        let customers = stmt
            .query_map([], |row| customer_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(customers)
    }

    pub async fn rename_customer(&self, id: CustomerId, name: &str) -> Result<Customer> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE customers SET name = ? WHERE id = ?",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "customer",
                id,
            });
        }
        Ok(Customer {
            id,
            name: name.to_string(),
        })
    }

    pub async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM customers WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "customer",
                id,
            });
        }
        info!(customer_id = id, "customer deleted");
        Ok(())
    }

    // Items

    pub async fn insert_item(&self, new: &NewItem) -> Result<Item> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO items (name, price) VALUES (?, ?)",
            params![new.name, new.price],
        )?;
        let id = conn.last_insert_rowid();
        debug!(item_id = id, "item inserted");
        Ok(Item {
            id,
            name: new.name.clone(),
            price: new.price,
        })
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        let conn = self.conn.lock().await;
        Ok(fetch_item(&conn, id)?)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, name, price FROM items ORDER BY id")?;
        let items = stmt
            .query_map([], |row| item_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub async fn update_item(&self, id: ItemId, new: &NewItem) -> Result<Item> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE items SET name = ?, price = ? WHERE id = ?",
            params![new.name, new.price, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { entity: "item", id });
        }
        Ok(Item {
            id,
            name: new.name.clone(),
            price: new.price,
        })
    }

    pub async fn delete_item(&self, id: ItemId) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM items WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound { entity: "item", id });
        }
        info!(item_id = id, "item deleted");
        Ok(())
    }

    // Reviews

    /// Inserts one review joining `customer_id` and `item_id`. Both rows must
    /// already exist; otherwise the foreign keys reject the insert.
    pub async fn link_customer_to_item(
        &self,
        customer_id: CustomerId,
        item_id: ItemId,
        comment: Option<&str>,
    ) -> Result<ReviewId> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO reviews (comment, customer_id, item_id) VALUES (?, ?, ?)",
            params![comment, customer_id, item_id],
        )?;
        let review_id = conn.last_insert_rowid();
        info!(review_id, customer_id, item_id, "customer linked to item");
        Ok(review_id)
    }

    /// Appends `item_id` to the customer's items by creating a review with no comment.
    pub async fn add_item_to_customer(
        &self,
        customer_id: CustomerId,
        item_id: ItemId,
    ) -> Result<ReviewId> {
        self.link_customer_to_item(customer_id, item_id, None).await
    }

    /// Appends `customer_id` to the item's customers by creating a review with no comment.
    pub async fn add_customer_to_item(
        &self,
        item_id: ItemId,
        customer_id: CustomerId,
    ) -> Result<ReviewId> {
        self.link_customer_to_item(customer_id, item_id, None).await
    }

    pub async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
        let conn = self.conn.lock().await;
        Ok(fetch_review(&conn, id)?)
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, comment, customer_id, item_id FROM reviews ORDER BY id")?;
        let reviews = stmt
            .query_map([], |row| review_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    pub async fn reviews_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Review>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, comment, customer_id, item_id FROM reviews
             WHERE customer_id = ? ORDER BY id",
        )?;
        let reviews = stmt
            .query_map([customer_id], |row| review_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    pub async fn reviews_for_item(&self, item_id: ItemId) -> Result<Vec<Review>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, comment, customer_id, item_id FROM reviews
             WHERE item_id = ? ORDER BY id",
        )?;
        let reviews = stmt
            .query_map([item_id], |row| review_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    pub async fn update_review_comment(
        &self,
        id: ReviewId,
        comment: Option<&str>,
    ) -> Result<Review> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE reviews SET comment = ? WHERE id = ?",
            params![comment, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "review",
                id,
            });
        }
        fetch_review(&conn, id)?.ok_or(StoreError::NotFound {
            entity: "review",
            id,
        })
    }

    pub async fn delete_review(&self, id: ReviewId) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM reviews WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "review",
                id,
            });
        }
        debug!(review_id = id, "review deleted");
        Ok(())
    }

    // Association views, always recomputed from the reviews table

    pub async fn items_of_customer(&self, customer_id: CustomerId) -> Result<Vec<Item>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT i.id, i.name, i.price
             FROM reviews r
             JOIN items i ON i.id = r.item_id
             WHERE r.customer_id = ?
             ORDER BY r.id",
        )?;
        let items = stmt
            .query_map([customer_id], |row| item_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub async fn customers_of_item(&self, item_id: ItemId) -> Result<Vec<Customer>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name
             FROM reviews r
             JOIN customers c ON c.id = r.customer_id
             WHERE r.item_id = ?
             ORDER BY r.id",
        )?;
        let customers = stmt
            .query_map([item_id], |row| customer_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(customers)
    }

    // Serialized views

    pub async fn customer_view(&self, id: CustomerId) -> Result<Option<CustomerView>> {
        let conn = self.conn.lock().await;
        let Some(customer) = fetch_customer(&conn, id)? else {
            return Ok(None);
        };
        let mut stmt = conn.prepare(
            "SELECT r.id, r.comment, r.customer_id, r.item_id, i.id, i.name, i.price
             FROM reviews r
             JOIN items i ON i.id = r.item_id
             WHERE r.customer_id = ?
             ORDER BY r.id",
        )?;
        let reviews = stmt
            .query_map([id], |row| Ok((review_from_row(row, 0)?, item_from_row(row, 4)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(CustomerView::new(customer, reviews)))
    }

    pub async fn item_view(&self, id: ItemId) -> Result<Option<ItemView>> {
        let conn = self.conn.lock().await;
        let Some(item) = fetch_item(&conn, id)? else {
            return Ok(None);
        };
        let mut stmt = conn.prepare(
            "SELECT r.id, r.comment, r.customer_id, r.item_id, c.id, c.name
             FROM reviews r
             JOIN customers c ON c.id = r.customer_id
             WHERE r.item_id = ?
             ORDER BY r.id",
        )?;
        let reviews = stmt
            .query_map([id], |row| {
                Ok((review_from_row(row, 0)?, customer_from_row(row, 4)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some(ItemView::new(item, reviews)))
    }

    pub async fn review_view(&self, id: ReviewId) -> Result<Option<ReviewView>> {
        let conn = self.conn.lock().await;
        let view = conn
            .query_row(
                &format!("{} WHERE r.id = ?", REVIEW_VIEW_SELECT),
                [id],
                review_view_from_row,
            )
            .optional()?;
        Ok(view)
    }

    pub async fn list_review_views(&self) -> Result<Vec<ReviewView>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("{} ORDER BY r.id", REVIEW_VIEW_SELECT))?;
        let views = stmt
            .query_map([], review_view_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(views)
    }
}

const REVIEW_VIEW_SELECT: &str =
    "SELECT r.id, r.comment, r.customer_id, r.item_id, c.id, c.name, i.id, i.name, i.price
     FROM reviews r
     JOIN customers c ON c.id = r.customer_id
     JOIN items i ON i.id = r.item_id";

fn review_view_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewView> {
    Ok(ReviewView::new(
        review_from_row(row, 0)?,
        customer_from_row(row, 4)?,
        item_from_row(row, 6)?,
    ))
}

fn customer_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(at)?,
        name: row.get(at + 1)?,
    })
}

fn item_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        price: row.get(at + 2)?,
    })
}

fn review_from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(at)?,
        comment: row.get(at + 1)?,
        customer_id: row.get(at + 2)?,
        item_id: row.get(at + 3)?,
    })
}

fn fetch_customer(conn: &Connection, id: CustomerId) -> rusqlite::Result<Option<Customer>> {
    conn.query_row("SELECT id, name FROM customers WHERE id = ?", [id], |row| {
        customer_from_row(row, 0)
    })
    .optional()
}

fn fetch_item(conn: &Connection, id: ItemId) -> rusqlite::Result<Option<Item>> {
    conn.query_row(
        "SELECT id, name, price FROM items WHERE id = ?",
        [id],
        |row| item_from_row(row, 0),
    )
    .optional()
}

fn fetch_review(conn: &Connection, id: ReviewId) -> rusqlite::Result<Option<Review>> {
    conn.query_row(
        "SELECT id, comment, customer_id, item_id FROM reviews WHERE id = ?",
        [id],
        |row| review_from_row(row, 0),
    )
    .optional()
}
