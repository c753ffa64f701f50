use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use std::collections::HashMap;

use crate::middleware::AuthUser;
use crate::models::categories::{self, Entity as Categories};
use crate::models::dto::VideoResponse;
use crate::models::users::Entity as Users;
use crate::models::videos::{self, Entity as Videos, VideoStatus};
use crate::services::moderation_service::{ModerationError, ModerationService};
use crate::services::stats_service::StatsService;
use crate::services::storage::StorageBackend;
use crate::services::visibility::filter_visible;

// Limite transport: le payload entier est bufferisé avant l'upload
const MAX_VIDEO_BYTES: usize = 100 * 1024 * 1024; // 100MB

#[derive(Clone, Copy)]
pub(crate) enum VideoOrder {
    SubmittedDesc,
    ValidatedDesc,
}

/// Charge des vidéos avec propriétaire et catégorie résolus, applique
/// (ou non) le filtre de visibilité, et construit les réponses API.
/// Partagé entre les listings publics et admin.
pub(crate) async fn load_video_responses(
    db: &DatabaseConnection,
    status: Option<VideoStatus>,
    apply_visibility: bool,
    order: VideoOrder,
) -> Result<Vec<VideoResponse>, DbErr> {
    let mut query = Videos::find().find_also_related(Users);

    if let Some(status) = status {
        query = query.filter(videos::Column::Status.eq(status));
    }

    query = match order {
        VideoOrder::SubmittedDesc => query.order_by_desc(videos::Column::SubmittedAt),
        VideoOrder::ValidatedDesc => query
            .order_by_desc(videos::Column::ValidatedAt)
            .order_by_desc(videos::Column::SubmittedAt),
    };

    let rows = query.all(db).await?;
    let total = rows.len();

    let rows = if apply_visibility {
        let filtered = filter_visible(rows);
        log::info!(
            "📹 Vidéos: {} total, {} visibles (utilisateurs non bannis)",
            total,
            filtered.len()
        );
        filtered
    } else {
        rows
    };

    let categories_by_id: HashMap<i32, categories::Model> = Categories::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(rows
        .iter()
        .map(|(video, owner)| {
            let category = video.category_id.and_then(|id| categories_by_id.get(&id));
            VideoResponse::build(video, owner.as_ref(), category)
        })
        .collect())
}

/// Traduit une erreur du workflow de modération en réponse HTTP
pub(crate) fn moderation_error_response(err: ModerationError) -> HttpResponse {
    match err {
        ModerationError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        })),
        ModerationError::Forbidden(_) => HttpResponse::Forbidden().json(serde_json::json!({
            "error": err.to_string()
        })),
        ModerationError::InvalidState(_) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string()
        })),
        ModerationError::Database(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

#[derive(Default)]
struct SubmitForm {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    recorded_video: Option<String>,
    copyright_ownership: Option<String>,
    terms_agreement: Option<String>,
    signature: Option<String>,
    recorder_email: Option<String>,
    owner_email: Option<String>,
    file: Option<(String, String, Vec<u8>)>, // (nom, content-type, données)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/videos/submit - Soumettre une vidéo (authentification requise)
#[post("/submit")]
pub async fn submit_video(
    auth_user: AuthUser,
    mut payload: Multipart,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<dyn StorageBackend>,
) -> HttpResponse {
    // 1. Dépouiller le multipart champ par champ
    let mut form = SubmitForm::default();

    while let Ok(Some(mut field)) = payload.try_next().await {
        // Nom, fichier et content-type extraits avant de consommer le flux
        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().unwrap_or("").to_string(),
                disposition
                    .get_filename()
                    .unwrap_or("video")
                    .to_string(),
            )
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if name == "video" {
            // Vidéos et images uniquement
            if !content_type.starts_with("video/") && !content_type.starts_with("image/") {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Type de fichier non supporté"
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
                if data.len() + chunk.len() > MAX_VIDEO_BYTES {
                    return HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "Fichier trop volumineux (100MB max)."
                    }));
                }
                data.extend_from_slice(&chunk);
            }

            form.file = Some((filename, content_type, data));
        } else {
            let mut buf = Vec::new();
            while let Some(chunk) = field.next().await {
                match chunk {
                    Ok(c) => buf.extend_from_slice(&c),
                    Err(_) => break,
                }
            }
            let value = String::from_utf8_lossy(&buf).to_string();

            match name.as_str() {
                "title" => form.title = Some(value),
                "description" => form.description = Some(value),
                "category" => form.category = Some(value),
                "recordedVideo" => form.recorded_video = Some(value),
                "copyrightOwnership" => form.copyright_ownership = Some(value),
                "termsAgreement" => form.terms_agreement = Some(value),
                "signature" => form.signature = Some(value),
                "recorderEmail" => form.recorder_email = Some(value),
                "ownerEmail" => form.owner_email = Some(value),
                _ => {}
            }
        }
    }

    // 2. Valider
    let Some((filename, content_type, data)) = form.file else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Aucun fichier vidéo envoyé."
        }));
    };

    let Some(title) = non_empty(form.title) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Le titre est requis."
        }));
    };

    // Catégorie optionnelle, ignorée si absente ou non numérique
    let category_id = non_empty(form.category).and_then(|c| c.parse::<i32>().ok());

    // 3. Uploader le fichier (bloque la requête jusqu'à la fin)
    let storage_url = match storage.store(&filename, &content_type, data).await {
        Ok(url) => url,
        Err(e) => {
            log::error!("❌ Erreur upload: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la soumission."
            }));
        }
    };

    // 4. Créer la vidéo en attente de validation
    let new_video = videos::ActiveModel {
        title: Set(title),
        description: Set(non_empty(form.description)),
        storage_url: Set(storage_url),
        category_id: Set(category_id),
        status: Set(VideoStatus::Pending),
        submitted_at: Set(chrono::Utc::now().naive_utc()),
        user_id: Set(Some(auth_user.user_id)),
        recorded_video: Set(Some(
            non_empty(form.recorded_video).unwrap_or_else(|| "no".to_string()),
        )),
        copyright_ownership: Set(Some(
            non_empty(form.copyright_ownership).unwrap_or_else(|| "no".to_string()),
        )),
        terms_agreement: Set(Some(form.terms_agreement.as_deref() == Some("true"))),
        signature: Set(Some(
            non_empty(form.signature).unwrap_or_else(|| "Non spécifié".to_string()),
        )),
        recorder_email: Set(non_empty(form.recorder_email)),
        owner_email: Set(non_empty(form.owner_email)),
        user_email: Set(Some(auth_user.email.clone())),
        ..Default::default()
    };

    let video = match new_video.insert(db.get_ref()).await {
        Ok(video) => video,
        Err(e) => {
            log::error!("❌ Erreur sauvegarde vidéo: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la soumission."
            }));
        }
    };

    log::info!(
        "📹 Vidéo {} soumise par {} (pending)",
        video.id,
        auth_user.email
    );

    HttpResponse::Created().json(serde_json::json!({
        "message": "Vidéo soumise avec succès, en attente de validation.",
        "video": VideoResponse::build(&video, None, None)
    }))
}

/// GET /api/videos - Liste publique des vidéos validées (visibles)
#[get("")]
pub async fn list_validated(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match load_video_responses(
        db.get_ref(),
        Some(VideoStatus::Validated),
        true,
        VideoOrder::SubmittedDesc,
    )
    .await
    {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des vidéos."
            }))
        }
    }
}

/// GET /api/videos/approved - Variante publique (même filtre)
#[get("/approved")]
pub async fn list_approved(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match load_video_responses(
        db.get_ref(),
        Some(VideoStatus::Validated),
        true,
        VideoOrder::SubmittedDesc,
    )
    .await
    {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos approuvées: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

/// GET /api/videos/pending - Liste publique des vidéos en attente (visibles)
#[get("/pending")]
pub async fn list_pending(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match load_video_responses(
        db.get_ref(),
        Some(VideoStatus::Pending),
        true,
        VideoOrder::SubmittedDesc,
    )
    .await
    {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos en attente: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des vidéos en attente."
            }))
        }
    }
}

/// GET /api/videos/stats - Statistiques publiques (filtrées)
#[get("/stats")]
pub async fn video_stats(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match StatsService::compute(db.get_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("❌ Erreur calcul statistiques: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors du calcul des statistiques"
            }))
        }
    }
}

/// DELETE /api/videos/{id}/cancel - Annuler sa propre vidéo en attente
#[delete("/{id}/cancel")]
pub async fn cancel_video(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let video_id = path.into_inner();

    match ModerationService::cancel(db.get_ref(), video_id, auth_user.user_id).await {
        Ok(()) => {
            log::info!(
                "✅ Vidéo {} annulée par l'utilisateur {}",
                video_id,
                auth_user.email
            );
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Vidéo annulée avec succès."
            }))
        }
        Err(e) => moderation_error_response(e),
    }
}

pub fn videos_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/videos")
            .service(submit_video)
            .service(list_approved)
            .service(list_pending)
            .service(video_stats)
            .service(cancel_video)
            .service(list_validated),
    );
}
