use actix_web::{web, App, HttpResponse, HttpServer};
use itemreviews::api;
use itemreviews::config::AppConfig;
use itemreviews::db::Database;
use std::io;
use tracing::info;

fn to_io(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let conf = AppConfig::from_env().map_err(to_io)?;
    itemreviews::telemetry::init_tracing(conf.debug).map_err(to_io)?;

    // Initialize the database
    let db = Database::new(&conf.database_path).map_err(to_io)?;
    let on_delete = db.create_schema(conf.delete_policy).await.map_err(to_io)?;
    let counts = db.row_counts().await.map_err(to_io)?;
    info!(
        customers = counts.customers,
        items = counts.items,
        reviews = counts.reviews,
        on_delete = %on_delete,
        "database ready"
    );

    let db = web::Data::new(db);
    info!("listening on http://{}", conf.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .configure(api::configure)
            .service(web::resource("/").route(web::get().to(index)))
    })
    .bind(&conf.bind_addr)?
    .run()
    .await
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("itemreviews: see /customers, /items, /reviews")
}
