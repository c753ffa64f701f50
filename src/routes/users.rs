use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::middleware::AuthUser;
use crate::models::categories::{self, Entity as Categories};
use crate::models::dto::{PaymentInfo, PublicUser, VideoResponse};
use crate::models::users::{self, Entity as Users};
use crate::models::videos::{self, Entity as Videos, VideoStatus};
use crate::routes::videos::moderation_error_response;
use crate::services::moderation_service::ModerationService;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfoRequest {
    pub payment_method: String,
    pub paypal_email: Option<String>,
    pub iban_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder: Option<String>,
    pub bic_code: Option<String>,
    pub crypto_type: Option<String>,
    pub crypto_address: Option<String>,
    pub full_name: Option<String>,
    pub tax_id: Option<String>,
}

fn missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Champs requis selon la méthode de paiement choisie
fn validate_payment_fields(body: &PaymentInfoRequest) -> Result<(), &'static str> {
    match body.payment_method.as_str() {
        "paypal" => {
            if missing(&body.paypal_email) {
                return Err("Adresse email PayPal requise");
            }
        }
        "iban" => {
            if missing(&body.iban_number)
                || missing(&body.bank_name)
                || missing(&body.account_holder)
            {
                return Err("IBAN, nom de banque et titulaire du compte requis");
            }
        }
        "crypto" => {
            if missing(&body.crypto_type) || missing(&body.crypto_address) {
                return Err("Type de cryptomonnaie et adresse de wallet requis");
            }
        }
        _ => return Err("Méthode de paiement requise (paypal, iban ou crypto)"),
    }
    Ok(())
}

/// GET /api/users/my-videos - Les vidéos de l'utilisateur connecté, avec
/// ses compteurs par statut (pas de filtre de visibilité sur sa propre vue)
#[get("/my-videos")]
pub async fn my_videos(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let videos = match Videos::find()
        .filter(videos::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(videos::Column::SubmittedAt)
        .all(db.get_ref())
        .await
    {
        Ok(videos) => videos,
        Err(e) => {
            log::error!("❌ Erreur récupération vidéos: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }));
        }
    };

    let categories_by_id: HashMap<i32, categories::Model> =
        match Categories::find().all(db.get_ref()).await {
            Ok(categories) => categories.into_iter().map(|c| (c.id, c)).collect(),
            Err(e) => {
                log::error!("❌ Erreur récupération catégories: {}", e);
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Erreur interne du serveur"
                }));
            }
        };

    let count =
        |status: VideoStatus| videos.iter().filter(|v| v.status == status).count();

    let stats = serde_json::json!({
        "total": videos.len(),
        "approved": count(VideoStatus::Validated),
        "pending": count(VideoStatus::Pending),
        "rejected": count(VideoStatus::Rejected),
    });

    let videos: Vec<VideoResponse> = videos
        .iter()
        .map(|v| {
            let category = v.category_id.and_then(|id| categories_by_id.get(&id));
            VideoResponse::build(v, None, category)
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "videos": videos,
        "stats": stats
    }))
}

/// DELETE /api/users/my-videos/{id} - Retirer une de ses vidéos.
/// Mêmes règles que l'annulation: propriétaire et statut pending uniquement.
#[delete("/my-videos/{id}")]
pub async fn delete_my_video(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let video_id = path.into_inner();

    match ModerationService::cancel(db.get_ref(), video_id, auth_user.user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Vidéo supprimée avec succès"
        })),
        Err(e) => moderation_error_response(e),
    }
}

/// GET /api/users/verify - Valider le token courant et renvoyer le profil
#[get("/verify")]
pub async fn verify_token(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(serde_json::json!({
            "valid": true,
            "user": PublicUser::from(&user)
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Utilisateur non trouvé"
        })),
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

/// POST /api/users/payment-info - Enregistrer ses informations de paiement.
/// Les champs requis dépendent de la méthode choisie.
#[post("/payment-info")]
pub async fn save_payment_info(
    auth_user: AuthUser,
    body: web::Json<PaymentInfoRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(message) = validate_payment_fields(&body) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": message
        }));
    }

    let user = match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
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

    let mut active: users::ActiveModel = user.into();
    active.payment_method = Set(Some(body.payment_method.clone()));
    active.paypal_email = Set(body.paypal_email.clone());
    active.iban_number = Set(body.iban_number.clone());
    active.bank_name = Set(body.bank_name.clone());
    active.account_holder = Set(body.account_holder.clone());
    active.bic_code = Set(body.bic_code.clone());
    active.crypto_type = Set(body.crypto_type.clone());
    active.crypto_address = Set(body.crypto_address.clone());
    active.full_name = Set(body.full_name.clone());
    active.tax_id = Set(body.tax_id.clone());

    match active.update(db.get_ref()).await {
        Ok(user) => {
            log::info!("💳 Informations de paiement sauvegardées pour {}", user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Informations de paiement sauvegardées avec succès",
                "paymentInfo": PaymentInfo::from_user(&user)
            }))
        }
        Err(e) => {
            log::error!("❌ Erreur sauvegarde paiement: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

/// GET /api/users/payment-info - Récupérer ses informations de paiement
#[get("/payment-info")]
pub async fn get_payment_info(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(serde_json::json!({
            "paymentInfo": PaymentInfo::from_user(&user)
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Utilisateur non trouvé"
        })),
        Err(e) => {
            log::error!("❌ Erreur récupération paiement: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Erreur interne du serveur"
            }))
        }
    }
}

pub fn users_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(my_videos)
            .service(delete_my_video)
            .service(verify_token)
            .service(save_payment_info)
            .service(get_payment_info),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str) -> PaymentInfoRequest {
        PaymentInfoRequest {
            payment_method: method.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_paypal_requires_email() {
        let mut body = request("paypal");
        assert!(validate_payment_fields(&body).is_err());

        body.paypal_email = Some("   ".to_string());
        assert!(validate_payment_fields(&body).is_err());

        body.paypal_email = Some("jean@example.com".to_string());
        assert!(validate_payment_fields(&body).is_ok());
    }

    #[test]
    fn test_iban_requires_bank_details() {
        let mut body = request("iban");
        body.iban_number = Some("FR7630006000011234567890189".to_string());
        body.bank_name = Some("Banque Populaire".to_string());
        // titulaire manquant
        assert!(validate_payment_fields(&body).is_err());

        body.account_holder = Some("Jean Dupont".to_string());
        assert!(validate_payment_fields(&body).is_ok());
    }

    #[test]
    fn test_crypto_requires_type_and_address() {
        let mut body = request("crypto");
        body.crypto_type = Some("btc".to_string());
        assert!(validate_payment_fields(&body).is_err());

        body.crypto_address = Some("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".to_string());
        assert!(validate_payment_fields(&body).is_ok());
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(validate_payment_fields(&request("cheque")).is_err());
        assert!(validate_payment_fields(&request("")).is_err());
    }
}
