use actix_web::{post, web, HttpResponse};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::dto::PublicUser;
use crate::models::users::{self, Column as UserColumn, Entity as Users};
use crate::utils::email::Mailer;
use crate::utils::jwt::{self, PrincipalKind};
use crate::utils::password;

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    pub name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    Users::find()
        .filter(UserColumn::Email.eq(email.to_lowercase()))
        .one(db)
        .await
}

/// POST /api/auth/register - Inscription avec vérification email
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
) -> HttpResponse {
    // 1. Valider les champs
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Nom, email et mot de passe requis"
        }));
    }

    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("{}", e)
        }));
    }

    // Même barème de force que le front: 3/5 minimum
    if password::password_strength(&body.password) < 3 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Le mot de passe doit être au moins de force moyenne (3/5). Veuillez choisir un mot de passe plus sécurisé."
        }));
    }

    // 2. Vérifier l'unicité de l'email
    match find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Cet email est déjà utilisé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
        _ => {}
    }

    // 3. Hasher le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("❌ Erreur hash mot de passe: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    // 4. Créer l'utilisateur non vérifié avec un token de vérification (24h)
    let verification_token = Uuid::new_v4().to_string();
    let now = Utc::now().naive_utc();

    let new_user = users::ActiveModel {
        name: Set(body.name.trim().to_string()),
        email: Set(body.email.to_lowercase()),
        password_hash: Set(password_hash),
        is_admin: Set(false),
        is_banned: Set(false),
        created_at: Set(now),
        email_verified: Set(false),
        email_verification_token: Set(Some(verification_token.clone())),
        email_verification_expires: Set(Some(now + Duration::hours(24))),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("❌ Erreur création utilisateur: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    // 5. Envoyer l'email de vérification (loggé si SMTP absent)
    if let Err(e) = mailer
        .send_verification_email(&user.email, &user.name, &verification_token)
        .await
    {
        log::error!("❌ Envoi email de vérification échoué: {}", e);
    }

    HttpResponse::Created().json(serde_json::json!({
        "message": "Compte créé avec succès. Vérifiez votre email pour activer votre compte.",
        "user": PublicUser::from(&user)
    }))
}

/// POST /api/auth/login - Connexion (email vérifié requis)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
) -> HttpResponse {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email et mot de passe requis"
        }));
    }

    // 1. Trouver l'utilisateur
    let user = match find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "Email ou mot de passe incorrect"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            log::error!("❌ Erreur vérification mot de passe: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "message": "Email ou mot de passe incorrect"
        }));
    }

    // 3. Email non vérifié: provisionner un token à la première tentative
    if !user.email_verified {
        if user.email_verification_token.is_none() {
            let token = Uuid::new_v4().to_string();
            let email = user.email.clone();
            let name = user.name.clone();

            let mut active: users::ActiveModel = user.into();
            active.email_verification_token = Set(Some(token.clone()));
            active.email_verification_expires =
                Set(Some(Utc::now().naive_utc() + Duration::hours(24)));

            if let Err(e) = active.update(db.get_ref()).await {
                log::error!("❌ Erreur sauvegarde token de vérification: {}", e);
            } else if let Err(e) = mailer.send_verification_email(&email, &name, &token).await {
                log::error!("❌ Envoi email de vérification échoué: {}", e);
            }
        }

        return HttpResponse::Forbidden().json(serde_json::json!({
            "message": "Veuillez vérifier votre email avant de vous connecter. Un email de vérification vous a été envoyé."
        }));
    }

    // 4. Horodater la connexion
    let user_id = user.id;
    let user_email = user.email.clone();
    let is_admin = user.is_admin;

    let mut active: users::ActiveModel = user.into();
    active.last_login = Set(Some(Utc::now().naive_utc()));

    let user = match active.update(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("❌ Erreur mise à jour last_login: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    // 5. Générer le JWT
    let token = match jwt::generate_token(user_id, &user_email, is_admin, PrincipalKind::User) {
        Ok(token) => token,
        Err(e) => {
            log::error!("❌ Erreur génération token: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user": PublicUser::from(&user),
        "message": "Connexion réussie"
    }))
}

/// POST /api/auth/verify-email - Confirmer l'adresse email
#[post("/verify-email")]
pub async fn verify_email(
    body: web::Json<VerifyEmailRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if body.token.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Token requis"
        }));
    }

    let user = match Users::find()
        .filter(UserColumn::EmailVerificationToken.eq(body.token.clone()))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Token invalide"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    if let Some(expires) = user.email_verification_expires {
        if Utc::now().naive_utc() > expires {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Token expiré. Demandez un nouvel email de vérification."
            }));
        }
    }

    // Le token est à usage unique: on l'efface en validant
    let mut active: users::ActiveModel = user.into();
    active.email_verified = Set(true);
    active.email_verification_token = Set(None);
    active.email_verification_expires = Set(None);

    match active.update(db.get_ref()).await {
        Ok(user) => {
            log::info!("✅ Email vérifié pour {}", user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Email vérifié avec succès. Vous pouvez maintenant vous connecter.",
                "user": PublicUser::from(&user)
            }))
        }
        Err(e) => {
            log::error!("❌ Erreur vérification email: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }))
        }
    }
}

/// POST /api/auth/forgot-password - Demande de réinitialisation.
/// Répond toujours le même message pour ne pas révéler si l'email existe.
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
) -> HttpResponse {
    const NEUTRAL_MESSAGE: &str =
        "Si cet email existe dans notre base de données, vous recevrez un lien de réinitialisation.";

    if body.email.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email requis"
        }));
    }

    let user = match find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Ok().json(serde_json::json!({ "message": NEUTRAL_MESSAGE }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    // Token de réinitialisation valable 1 heure
    let reset_token = Uuid::new_v4().to_string();
    let email = user.email.clone();

    let mut active: users::ActiveModel = user.into();
    active.reset_password_token = Set(Some(reset_token.clone()));
    active.reset_password_expires = Set(Some(Utc::now().naive_utc() + Duration::hours(1)));

    if let Err(e) = active.update(db.get_ref()).await {
        log::error!("❌ Erreur sauvegarde token de reset: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Erreur serveur"
        }));
    }

    if let Err(e) = mailer.send_reset_email(&email, &reset_token).await {
        log::error!("❌ Envoi email de reset échoué: {}", e);
    }

    HttpResponse::Ok().json(serde_json::json!({ "message": NEUTRAL_MESSAGE }))
}

/// POST /api/auth/reset-password - Réinitialiser avec un token valide
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if body.token.trim().is_empty() || body.new_password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Token et nouveau mot de passe requis"
        }));
    }

    let user = match Users::find()
        .filter(UserColumn::ResetPasswordToken.eq(body.token.clone()))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Token invalide"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    if let Some(expires) = user.reset_password_expires {
        if Utc::now().naive_utc() > expires {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Token expiré"
            }));
        }
    }

    let password_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("❌ Erreur hash mot de passe: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.reset_password_token = Set(None);
    active.reset_password_expires = Set(None);

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Mot de passe mis à jour avec succès"
        })),
        Err(e) => {
            log::error!("❌ Erreur réinitialisation mot de passe: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }))
        }
    }
}

/// POST /api/auth/resend-verification - Renvoyer l'email de vérification
#[post("/resend-verification")]
pub async fn resend_verification(
    body: web::Json<ResendVerificationRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<Mailer>,
) -> HttpResponse {
    let user = match find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "message": "Utilisateur non trouvé"
            }));
        }
        Err(e) => {
            log::error!("❌ Erreur base de données: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Erreur serveur"
            }));
        }
    };

    if user.email_verified {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Cet email est déjà vérifié"
        }));
    }

    let token = Uuid::new_v4().to_string();
    let email = user.email.clone();
    let name = user.name.clone();

    let mut active: users::ActiveModel = user.into();
    active.email_verification_token = Set(Some(token.clone()));
    active.email_verification_expires = Set(Some(Utc::now().naive_utc() + Duration::hours(24)));

    if let Err(e) = active.update(db.get_ref()).await {
        log::error!("❌ Erreur sauvegarde token de vérification: {}", e);
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Erreur serveur"
        }));
    }

    if let Err(e) = mailer.send_verification_email(&email, &name, &token).await {
        log::error!("❌ Envoi email de vérification échoué: {}", e);
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Email de vérification renvoyé"
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(verify_email)
            .service(forgot_password)
            .service(reset_password)
            .service(resend_verification),
    );
}
