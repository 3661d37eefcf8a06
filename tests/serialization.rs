use itemreviews::models::{NewCustomer, NewItem};
use itemreviews::{Database, DeletePolicy};
use serde_json::Value;

async fn seeded() -> (Database, i64, i64, i64) {
    let db = Database::open_in_memory().unwrap();
    db.create_schema(DeletePolicy::Restrict).await.unwrap();
    let customer = db
        .insert_customer(&NewCustomer { name: "Alice".into() })
        .await
        .unwrap();
    let item = db
        .insert_item(&NewItem {
            name: "Lamp".into(),
            price: 19.5,
        })
        .await
        .unwrap();
    let review_id = db
        .link_customer_to_item(customer.id, item.id, Some("bright enough"))
        .await
        .unwrap();
    (db, customer.id, item.id, review_id)
}

#[tokio::test]
async fn test_review_serializes_both_ends_without_their_reviews() {
    let (db, customer_id, item_id, review_id) = seeded().await;
    let view = db.review_view(review_id).await.unwrap().unwrap();
    let value = serde_json::to_value(&view).unwrap();

    assert_eq!(value["customer"]["id"], customer_id);
    assert_eq!(value["item"]["id"], item_id);
    assert!(value["customer"].get("reviews").is_none());
    assert!(value["item"].get("reviews").is_none());
}

#[tokio::test]
async fn test_customer_serializes_reviews_without_back_reference() {
    let (db, customer_id, item_id, _) = seeded().await;
    // A second review of the same item shows up as a second entry.
    db.add_item_to_customer(customer_id, item_id).await.unwrap();

    let view = db.customer_view(customer_id).await.unwrap().unwrap();
    let value = serde_json::to_value(&view).unwrap();
    let reviews = value["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    for review in reviews {
        assert!(review.get("customer").is_none());
        assert_eq!(review["customer_id"], customer_id);
        assert_eq!(review["item"]["name"], "Lamp");
    }
    assert_eq!(reviews[1]["comment"], Value::Null);
}

#[tokio::test]
async fn test_item_serializes_reviews_without_back_reference() {
    let (db, customer_id, item_id, _) = seeded().await;
    let view = db.item_view(item_id).await.unwrap().unwrap();
    let value = serde_json::to_value(&view).unwrap();
    let review = &value["reviews"][0];
    assert!(review.get("item").is_none());
    assert_eq!(review["customer"]["id"], customer_id);
    assert_eq!(value["price"], 19.5);
}

#[tokio::test]
async fn test_records_display_like_diagnostics() {
    let (db, customer_id, item_id, review_id) = seeded().await;
    let customer = db.get_customer(customer_id).await.unwrap().unwrap();
    let item = db.get_item(item_id).await.unwrap().unwrap();
    let review = db.get_review(review_id).await.unwrap().unwrap();

    assert_eq!(customer.to_string(), format!("<Customer {}, Alice>", customer_id));
    assert_eq!(item.to_string(), format!("<Item {}, Lamp, 19.5>", item_id));
    assert_eq!(
        review.to_string(),
        format!("<Review {}, customer {}, item {}>", review_id, customer_id, item_id)
    );
}
