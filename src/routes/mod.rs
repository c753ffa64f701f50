pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod partners;
pub mod users;
pub mod videos;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(videos::videos_routes)
            .configure(categories::categories_routes)
            .configure(partners::partners_routes)
            .configure(auth::auth_routes)
            .configure(users::users_routes)
            .configure(admin::admin_routes),
    );
}
