mod models;
mod routes;
mod db;
mod services;
mod utils;
mod middleware;

use actix_web::{web, App, HttpServer};
use std::env;

use crate::services::storage::{self, StorageBackend};
use crate::utils::email::Mailer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let db = web::Data::new(db);
    let storage: web::Data<dyn StorageBackend> = web::Data::from(storage::from_env());
    let mailer = Mailer::from_env();
    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    println!("🚀 Starting server on http://127.0.0.1:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(storage.clone())
            .app_data(web::Data::new(mailer.clone()))
            .configure(routes::configure_routes)
            // Fichiers uploadés en local, servis tels quels
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
