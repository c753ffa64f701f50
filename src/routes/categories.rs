use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::models::categories::{self, Entity as Categories};

/// GET /api/categories - Liste publique des catégories
#[get("")]
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Categories::find()
        .order_by_asc(categories::Column::Name)
        .all(db.get_ref())
        .await
    {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => {
            log::error!("❌ Erreur récupération catégories: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des catégories"
            }))
        }
    }
}

pub fn categories_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/categories").service(list_categories));
}
