use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::AdminUser;
use crate::models::admins::{Column as AdminColumn, Entity as Admins};
use crate::models::dto::{PaymentInfo, PublicUser, VideoBrief, VideoResponse};
use crate::models::users::{self, Column as UserColumn, Entity as Users};
use crate::models::videos::{self, Entity as Videos, VideoStatus};
use crate::routes::videos::{load_video_responses, moderation_error_response, VideoOrder};
use crate::services::category_service::{CategoryError, CategoryService};
use crate::services::moderation_service::ModerationService;
use crate::utils::jwt::{self, PrincipalKind};
use crate::utils::password;

#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub rejection_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCategoryRequest {
    pub category_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanRequest {
    pub is_banned: bool,
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ContactRequest {
    pub name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// POST /api/admin/login - Connexion admin.
/// Les deux sources d'identifiants (table admins héritée, comptes users
/// avec is_admin) aboutissent à la même forme de claims.
#[post("/login")]
pub async fn admin_login(
    body: web::Json<AdminLoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Table admins héritée
    let admin = match Admins::find()
        .filter(AdminColumn::Username.eq(&body.username))
        .one(db.get_ref())
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur serveur"
            }));
        }
    };

    if let Some(admin) = admin {
        if password::verify_password(&body.password, &admin.password_hash).unwrap_or(false) {
            return match jwt::generate_token(
                admin.id,
                &admin.username,
                true,
                PrincipalKind::Admin,
            ) {
                Ok(token) => HttpResponse::Ok().json(serde_json::json!({ "token": token })),
                Err(e) => {
                    log::error!("❌ Erreur génération token: {}", e);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": "Erreur serveur"
                    }))
                }
            };
        }
    }

    // 2. Compte utilisateur avec le flag admin
    let user = match Users::find()
        .filter(UserColumn::Email.eq(body.username.to_lowercase()))
        .filter(UserColumn::IsAdmin.eq(true))
        .one(db.get_ref())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur serveur"
            }));
        }
    };

    if let Some(user) = user {
        if password::verify_password(&body.password, &user.password_hash).unwrap_or(false) {
            return match jwt::generate_token(user.id, &user.email, true, PrincipalKind::User) {
                Ok(token) => HttpResponse::Ok().json(serde_json::json!({ "token": token })),
                Err(e) => {
                    log::error!("❌ Erreur génération token: {}", e);
                    HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": "Erreur serveur"
                    }))
                }
            };
        }
    }

    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Identifiants invalides"
    }))
}

/// GET /api/admin/videos - Vidéos en attente de validation (visibles)
#[get("/videos")]
pub async fn pending_videos(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
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
            log::error!("❌ Erreur récupération vidéos: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des vidéos."
            }))
        }
    }
}

/// GET /api/admin/videos/approved - Vidéos validées, dernière validation en tête
#[get("/videos/approved")]
pub async fn approved_videos(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match load_video_responses(
        db.get_ref(),
        Some(VideoStatus::Validated),
        true,
        VideoOrder::ValidatedDesc,
    )
    .await
    {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos approuvées: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des vidéos approuvées."
            }))
        }
    }
}

/// GET /api/admin/videos/all - Toutes les vidéos, tous statuts, sans filtre
#[get("/videos/all")]
pub async fn all_videos(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match load_video_responses(db.get_ref(), None, false, VideoOrder::SubmittedDesc).await {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur lors de la récupération des vidéos."
            }))
        }
    }
}

/// POST /api/admin/videos/{id}/validate - Valider une vidéo en attente
#[post("/videos/{id}/validate")]
pub async fn validate_video(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ModerationService::validate(db.get_ref(), path.into_inner()).await {
        Ok(video) => {
            log::info!("✅ Vidéo {} validée", video.id);
            HttpResponse::Ok().json(VideoResponse::build(&video, None, None))
        }
        Err(e) => moderation_error_response(e),
    }
}

/// POST /api/admin/videos/{id}/reject - Rejeter avec une raison optionnelle
#[post("/videos/{id}/reject")]
pub async fn reject_video(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<RejectRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ModerationService::reject(db.get_ref(), path.into_inner(), body.rejection_reason.clone())
        .await
    {
        Ok(video) => {
            log::info!("✅ Vidéo {} rejetée", video.id);
            HttpResponse::Ok().json(VideoResponse::build(&video, None, None))
        }
        Err(e) => moderation_error_response(e),
    }
}

/// PUT /api/admin/videos/{id}/category - Changer ou retirer la catégorie
#[put("/videos/{id}/category")]
pub async fn set_video_category(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<SetCategoryRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ModerationService::set_category(db.get_ref(), path.into_inner(), body.category_id).await
    {
        Ok(video) => HttpResponse::Ok().json(VideoResponse::build(&video, None, None)),
        Err(e) => moderation_error_response(e),
    }
}

/// DELETE /api/admin/videos/{id} - Suppression admin, quel que soit le statut
#[delete("/videos/{id}")]
pub async fn delete_video(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ModerationService::delete(db.get_ref(), path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Vidéo supprimée."
        })),
        Err(e) => moderation_error_response(e),
    }
}

/// GET /api/admin/users - Tous les utilisateurs avec leurs vidéos
#[get("/users")]
pub async fn list_users(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let users = match Users::find().all(db.get_ref()).await {
        Ok(users) => users,
        Err(e) => {
            log::error!("❌ Erreur récupération utilisateurs: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    let mut out = Vec::with_capacity(users.len());
    for user in &users {
        let videos = match Videos::find()
            .filter(videos::Column::UserId.eq(user.id))
            .order_by_desc(videos::Column::SubmittedAt)
            .all(db.get_ref())
            .await
        {
            Ok(videos) => videos,
            Err(e) => {
                log::error!("❌ Erreur récupération vidéos utilisateur: {}", e);
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Erreur interne du serveur"
                }));
            }
        };

        out.push(serde_json::json!({
            "user": PublicUser::from(user),
            "paymentInfo": PaymentInfo::from_user(user),
            "videos": videos.iter().map(VideoBrief::from).collect::<Vec<_>>(),
        }));
    }

    log::info!("👥 {} utilisateurs récupérés", out.len());
    HttpResponse::Ok().json(out)
}

/// GET /api/admin/users/{id} - Détails d'un utilisateur et ses vidéos
#[get("/users/{id}")]
pub async fn user_details(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match Users::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Utilisateur non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    let videos = match Videos::find()
        .filter(videos::Column::UserId.eq(user.id))
        .order_by_desc(videos::Column::SubmittedAt)
        .all(db.get_ref())
        .await
    {
        Ok(videos) => videos,
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos utilisateur: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "user": PublicUser::from(&user),
        "paymentInfo": PaymentInfo::from_user(&user),
        "videos": videos
            .iter()
            .map(|v| VideoResponse::build(v, Some(&user), None))
            .collect::<Vec<_>>(),
    }))
}

/// PATCH /api/admin/users/{id}/ban - Bannir ou débannir.
/// Un administrateur ne peut pas être banni. Les vidéos d'un utilisateur
/// banni disparaissent de toutes les vues mais ne sont pas supprimées.
#[patch("/users/{id}/ban")]
pub async fn ban_user(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<BanRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match Users::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Utilisateur non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    if user.is_admin {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Impossible de bannir un administrateur"
        }));
    }

    let is_banned = body.is_banned;
    let mut active: users::ActiveModel = user.into();
    active.is_banned = Set(is_banned);

    match active.update(db.get_ref()).await {
        Ok(user) => {
            log::info!(
                "✅ Statut ban modifié: {} isBanned={}",
                user.email,
                user.is_banned
            );
            HttpResponse::Ok().json(serde_json::json!({
                "message": if is_banned {
                    "Utilisateur banni avec succès"
                } else {
                    "Utilisateur débanni avec succès"
                },
                "user": PublicUser::from(&user)
            }))
        }
        Err(e) => {
            log::error!("❌ Erreur modification statut ban: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

/// DELETE /api/admin/users/{id} - Supprimer un utilisateur et ses vidéos
#[delete("/users/{id}")]
pub async fn delete_user(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match Users::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Utilisateur non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    if user.is_admin {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Vous ne pouvez pas supprimer un compte administrateur."
        }));
    }

    // Cascade: les vidéos de l'utilisateur partent avec lui
    let deleted_videos = match Videos::delete_many()
        .filter(videos::Column::UserId.eq(user.id))
        .exec(db.get_ref())
        .await
    {
        Ok(res) => res.rows_affected,
        Err(e) => {
            log::error!("❌ Erreur suppression vidéos: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    let name = user.name.clone();
    let email = user.email.clone();

    if let Err(e) = Users::delete_by_id(user.id).exec(db.get_ref()).await {
        log::error!("❌ Erreur suppression utilisateur: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Erreur interne du serveur"
        }));
    }

    log::info!(
        "🗑️ Utilisateur {} supprimé ({} vidéos supprimées)",
        email,
        deleted_videos
    );

    HttpResponse::Ok().json(serde_json::json!({
        "message": format!(
            "Utilisateur \"{}\" supprimé avec succès. {} vidéo(s) supprimée(s).",
            name, deleted_videos
        ),
        "deletedVideosCount": deleted_videos
    }))
}

/// GET /api/admin/categories - Catégories avec leur nombre de vidéos
#[get("/categories")]
pub async fn list_categories(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match CategoryService::list_with_counts(db.get_ref()).await {
        Ok(categories) => {
            let out: Vec<_> = categories
                .into_iter()
                .map(|(category, video_count)| {
                    serde_json::json!({
                        "id": category.id,
                        "name": category.name,
                        "description": category.description,
                        "videoCount": video_count,
                    })
                })
                .collect();
            HttpResponse::Ok().json(out)
        }
        Err(e) => category_error_response(e),
    }
}

/// POST /api/admin/categories - Créer une catégorie
#[post("/categories")]
pub async fn create_category(
    _admin: AdminUser,
    body: web::Json<CategoryRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match CategoryService::create(db.get_ref(), &body.name, body.description.clone()).await {
        Ok(category) => HttpResponse::Created().json(category),
        Err(e) => category_error_response(e),
    }
}

/// PUT /api/admin/categories/{id} - Renommer une catégorie
#[put("/categories/{id}")]
pub async fn update_category(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<CategoryRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match CategoryService::rename(db.get_ref(), path.into_inner(), &body.name).await {
        Ok(category) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Catégorie modifiée avec succès.",
            "category": category
        })),
        Err(e) => category_error_response(e),
    }
}

/// DELETE /api/admin/categories/{id} - Suppression avec détachement des
/// vidéos référentes, en une transaction
#[delete("/categories/{id}")]
pub async fn delete_category(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match CategoryService::delete_with_detach(db.get_ref(), path.into_inner()).await {
        Ok(detached) => {
            let message = if detached > 0 {
                format!(
                    "Catégorie supprimée avec succès. {} vidéo(s) ont été mises à jour (catégorie retirée).",
                    detached
                )
            } else {
                "Catégorie supprimée avec succès.".to_string()
            };
            HttpResponse::Ok().json(serde_json::json!({
                "message": message,
                "updatedVideosCount": detached
            }))
        }
        Err(e) => category_error_response(e),
    }
}

/// POST /api/admin/contact - Formulaire de contact (public)
#[post("/contact")]
pub async fn contact(body: web::Json<ContactRequest>) -> HttpResponse {
    if body.name.trim().is_empty()
        || body.email.trim().is_empty()
        || body.subject.trim().is_empty()
        || body.message.trim().is_empty()
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Tous les champs sont requis"
        }));
    }

    if body.validate().is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Adresse email invalide"
        }));
    }

    log::info!(
        "📧 Message de contact de {} <{}>: {}",
        body.name,
        body.email,
        body.subject
    );

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Message envoyé avec succès ! Nous vous répondrons dans les plus brefs délais.",
        "success": true
    }))
}

fn category_error_response(err: CategoryError) -> HttpResponse {
    match err {
        CategoryError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        })),
        CategoryError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string()
        })),
        CategoryError::Database(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin_login)
            .service(contact)
            // Routes littérales avant les routes paramétrées
            .service(approved_videos)
            .service(all_videos)
            .service(pending_videos)
            .service(validate_video)
            .service(reject_video)
            .service(set_video_category)
            .service(delete_video)
            .service(list_users)
            .service(ban_user)
            .service(delete_user)
            .service(user_details)
            .service(list_categories)
            .service(create_category)
            .service(update_category)
            .service(delete_category),
    );
}
