use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::middleware::AdminUser;
use crate::models::partners::{self, Entity as Partners, VALID_STATUSES};
use crate::services::storage::StorageBackend;

// Images de profil uniquement, petites
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024; // 5MB

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// GET /api/partners - Partenaires actifs, les plus récents d'abord (public)
#[get("")]
pub async fn list_partners(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Partners::find()
        .filter(partners::Column::Status.eq("active"))
        .order_by_desc(partners::Column::CreatedAt)
        .all(db.get_ref())
        .await
    {
        Ok(partners) => HttpResponse::Ok().json(partners),
        Err(e) => {
            log::error!("❌ Erreur récupération partenaires: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des partenaires"
            }))
        }
    }
}

/// GET /api/partners/{id} - Détail d'un partenaire (public)
#[get("/{id}")]
pub async fn get_partner(path: web::Path<i32>, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Partners::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(partner)) => HttpResponse::Ok().json(partner),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Partenaire non trouvé"
        })),
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

/// POST /api/partners - Créer un partenaire (admin)
#[post("")]
pub async fn create_partner(
    _admin: AdminUser,
    body: web::Json<PartnerRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let Some(name) = non_empty(&body.name) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Le nom est requis"
        }));
    };
    let Some(username) = non_empty(&body.username) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Le nom d'utilisateur est requis"
        }));
    };

    let status = non_empty(&body.status).unwrap_or_else(|| "active".to_string());
    if !VALID_STATUSES.contains(&status.as_str()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Statut invalide (active ou inactive)"
        }));
    }

    let now = chrono::Utc::now().naive_utc();
    let new_partner = partners::ActiveModel {
        name: Set(name),
        username: Set(username),
        email: Set(non_empty(&body.email)),
        website: Set(non_empty(&body.website)),
        profile_image: Set(non_empty(&body.profile_image)),
        description: Set(non_empty(&body.description)),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_partner.insert(db.get_ref()).await {
        Ok(partner) => {
            log::info!("🤝 Partenaire créé: {}", partner.name);
            HttpResponse::Created().json(partner)
        }
        Err(e) => {
            log::error!("❌ Erreur création partenaire: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la création du partenaire"
            }))
        }
    }
}

/// PUT /api/partners/{id} - Modifier un partenaire (admin).
/// Seuls les champs fournis sont modifiés.
#[put("/{id}")]
pub async fn update_partner(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<PartnerRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let partner = match Partners::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(partner)) => partner,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Partenaire non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    if let Some(status) = non_empty(&body.status) {
        if !VALID_STATUSES.contains(&status.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Statut invalide (active ou inactive)"
            }));
        }
    }

    let mut active: partners::ActiveModel = partner.into();
    if let Some(name) = non_empty(&body.name) {
        active.name = Set(name);
    }
    if let Some(username) = non_empty(&body.username) {
        active.username = Set(username);
    }
    if body.email.is_some() {
        active.email = Set(non_empty(&body.email));
    }
    if body.website.is_some() {
        active.website = Set(non_empty(&body.website));
    }
    if body.profile_image.is_some() {
        active.profile_image = Set(non_empty(&body.profile_image));
    }
    if body.description.is_some() {
        active.description = Set(non_empty(&body.description));
    }
    if let Some(status) = non_empty(&body.status) {
        active.status = Set(status);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    match active.update(db.get_ref()).await {
        Ok(partner) => HttpResponse::Ok().json(partner),
        Err(e) => {
            log::error!("❌ Erreur modification partenaire: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la modification du partenaire"
            }))
        }
    }
}

/// DELETE /api/partners/{id} - Supprimer un partenaire (admin)
#[delete("/{id}")]
pub async fn delete_partner(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();

    match Partners::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Partenaire non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    }

    match Partners::delete_by_id(id).exec(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Partenaire supprimé avec succès"
        })),
        Err(e) => {
            log::error!("❌ Erreur suppression partenaire: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la suppression du partenaire"
            }))
        }
    }
}

/// POST /api/partners/upload-image - Uploader une image de profil (admin).
/// Retourne l'URL à renseigner dans profileImage.
#[post("/upload-image")]
pub async fn upload_partner_image(
    _admin: AdminUser,
    mut payload: Multipart,
    storage: web::Data<dyn StorageBackend>,
) -> HttpResponse {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().unwrap_or("").to_string(),
                disposition.get_filename().unwrap_or("image").to_string(),
            )
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if name != "image" {
            continue;
        }

        if !matches!(
            content_type.as_str(),
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif"
        ) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Format d'image non supporté (jpeg, png ou gif)"
            }));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    log::error!("❌ Erreur de lecture du fichier: {}", e);
                    return HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "Erreur de lecture du fichier envoyé."
                    }));
                }
            };
            if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Image trop volumineuse (5MB max)."
                }));
            }
            data.extend_from_slice(&chunk);
        }

        file = Some((filename, content_type, data));
    }

    let Some((filename, content_type, data)) = file else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Aucune image envoyée."
        }));
    };

    match storage.store(&filename, &content_type, data).await {
        Ok(url) => HttpResponse::Ok().json(serde_json::json!({ "imageUrl": url })),
        Err(e) => {
            log::error!("❌ Erreur upload image: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de l'upload de l'image"
            }))
        }
    }
}

pub fn partners_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/partners")
            .service(upload_partner_image)
            .service(create_partner)
            .service(list_partners)
            .service(update_partner)
            .service(delete_partner)
            .service(get_partner),
    );
}
