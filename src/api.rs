use crate::db::Database;
use crate::error::StoreError;
use crate::models::{CustomerId, ItemId, NewCustomer, NewItem, NewReview, ReviewId};
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize, Deserialize)]
pub struct AddItemRequest {
    pub item_id: ItemId,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct AddCustomerRequest {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Registers every route on the given service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::delete().to(delete_customer))
            .route("/{id}/items", web::get().to(customer_items))
            .route("/{id}/items", web::post().to(add_item_to_customer)),
    )
    .service(
        web::scope("/items")
            .route("", web::get().to(list_items))
            .route("", web::post().to(create_item))
            .route("/{id}", web::get().to(get_item))
            .route("/{id}", web::delete().to(delete_item))
            .route("/{id}/customers", web::get().to(item_customers))
            .route("/{id}/customers", web::post().to(add_customer_to_item)),
    )
    .service(
        web::scope("/reviews")
            .route("", web::get().to(list_reviews))
            .route("", web::post().to(create_review))
            .route("/{id}", web::get().to(get_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}

fn error_response(err: StoreError) -> HttpResponse {
    let status = match &err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        StoreError::Database(_) | StoreError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    // Driver and config detail stays in the log, not the response body.
    let message = if status.is_server_error() {
        error!("[API] request failed: {}", err);
        "internal server error".to_string()
    } else {
        warn!("[API] request rejected: {}", err);
        err.to_string()
    };
    HttpResponse::build(status).json(ErrorBody { message })
}

fn not_found(entity: &'static str, id: i64) -> HttpResponse {
    error_response(StoreError::NotFound { entity, id })
}

// Customers

pub async fn list_customers(db: web::Data<Database>) -> HttpResponse {
    match db.list_customers().await {
        Ok(customers) => HttpResponse::Ok().json(customers),
        Err(err) => error_response(err),
    }
}

pub async fn create_customer(
    db: web::Data<Database>,
    body: web::Json<NewCustomer>,
) -> HttpResponse {
    match db.insert_customer(&body).await {
        Ok(customer) => {
            info!("[API] Created customer {}", customer);
            HttpResponse::Created().json(customer)
        }
        Err(err) => error_response(err),
    }
}

pub async fn get_customer(db: web::Data<Database>, id: web::Path<CustomerId>) -> HttpResponse {
    let id = id.into_inner();
    match db.customer_view(id).await {
        Ok(Some(view)) => HttpResponse::Ok().json(view),
        Ok(None) => not_found("customer", id),
        Err(err) => error_response(err),
    }
}

pub async fn delete_customer(
    db: web::Data<Database>,
    id: web::Path<CustomerId>,
) -> HttpResponse {
    match db.delete_customer(id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

pub async fn customer_items(db: web::Data<Database>, id: web::Path<CustomerId>) -> HttpResponse {
    let id = id.into_inner();
    match db.get_customer(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("customer", id),
        Err(err) => return error_response(err),
    }
    match db.items_of_customer(id).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err),
    }
}

pub async fn add_item_to_customer(
    db: web::Data<Database>,
    id: web::Path<CustomerId>,
    body: web::Json<AddItemRequest>,
) -> HttpResponse {
    let customer_id = id.into_inner();
    let linked = match body.comment.as_deref() {
        Some(comment) => {
            db.link_customer_to_item(customer_id, body.item_id, Some(comment))
                .await
        }
        None => db.add_item_to_customer(customer_id, body.item_id).await,
    };
    created_review(&db, linked).await
}

// Items

pub async fn list_items(db: web::Data<Database>) -> HttpResponse {
    match db.list_items().await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => error_response(err),
    }
}

pub async fn create_item(db: web::Data<Database>, body: web::Json<NewItem>) -> HttpResponse {
    match db.insert_item(&body).await {
        Ok(item) => {
            info!("[API] Created item {}", item);
            HttpResponse::Created().json(item)
        }
        Err(err) => error_response(err),
    }
}

pub async fn get_item(db: web::Data<Database>, id: web::Path<ItemId>) -> HttpResponse {
    let id = id.into_inner();
    match db.item_view(id).await {
        Ok(Some(view)) => HttpResponse::Ok().json(view),
        Ok(None) => not_found("item", id),
        Err(err) => error_response(err),
    }
}

pub async fn delete_item(db: web::Data<Database>, id: web::Path<ItemId>) -> HttpResponse {
    match db.delete_item(id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

pub async fn item_customers(db: web::Data<Database>, id: web::Path<ItemId>) -> HttpResponse {
    let id = id.into_inner();
    match db.get_item(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("item", id),
        Err(err) => return error_response(err),
    }
    match db.customers_of_item(id).await {
        Ok(customers) => HttpResponse::Ok().json(customers),
        Err(err) => error_response(err),
    }
}

pub async fn add_customer_to_item(
    db: web::Data<Database>,
    id: web::Path<ItemId>,
    body: web::Json<AddCustomerRequest>,
) -> HttpResponse {
    let item_id = id.into_inner();
    let linked = match body.comment.as_deref() {
        Some(comment) => {
            db.link_customer_to_item(body.customer_id, item_id, Some(comment))
                .await
        }
        None => db.add_customer_to_item(item_id, body.customer_id).await,
    };
    created_review(&db, linked).await
}

// Reviews

pub async fn list_reviews(db: web::Data<Database>) -> HttpResponse {
    match db.list_review_views().await {
        Ok(views) => HttpResponse::Ok().json(views),
        Err(err) => error_response(err),
    }
}

pub async fn create_review(db: web::Data<Database>, body: web::Json<NewReview>) -> HttpResponse {
    let review_id = match db
        .link_customer_to_item(body.customer_id, body.item_id, body.comment.as_deref())
        .await
    {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    match db.review_view(review_id).await {
        Ok(Some(view)) => HttpResponse::Created().json(view),
        Ok(None) => not_found("review", review_id),
        Err(err) => error_response(err),
    }
}

pub async fn get_review(db: web::Data<Database>, id: web::Path<ReviewId>) -> HttpResponse {
    let id = id.into_inner();
    match db.review_view(id).await {
        Ok(Some(view)) => HttpResponse::Ok().json(view),
        Ok(None) => not_found("review", id),
        Err(err) => error_response(err),
    }
}

pub async fn delete_review(db: web::Data<Database>, id: web::Path<ReviewId>) -> HttpResponse {
    match db.delete_review(id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

async fn created_review(db: &Database, linked: crate::Result<ReviewId>) -> HttpResponse {
    let review_id = match linked {
        Ok(id) => id,
        Err(err) => return error_response(err),
    };
    match db.get_review(review_id).await {
        Ok(Some(review)) => HttpResponse::Created().json(review),
        Ok(None) => not_found("review", review_id),
        Err(err) => error_response(err),
    }
}
