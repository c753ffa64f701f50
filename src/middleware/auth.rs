use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt::{self, Claims, PrincipalKind};

/// Acteur authentifié, résolu depuis les claims AVANT tout contrôle
/// d'autorisation. Unifie les deux schémas d'identification (table admins
/// héritée et users.is_admin) en une seule abstraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Principal {
    /// Identifiants de la table admins héritée
    AdminCredential { id: i32, username: String },
    /// Compte utilisateur standard (is_admin possible)
    UserAccount {
        id: i32,
        email: String,
        is_admin: bool,
    },
}

impl Principal {
    fn from_claims(claims: Claims) -> Self {
        match claims.kind {
            PrincipalKind::Admin => Principal::AdminCredential {
                id: claims.sub,
                username: claims.email,
            },
            PrincipalKind::User => Principal::UserAccount {
                id: claims.sub,
                email: claims.email,
                is_admin: claims.is_admin,
            },
        }
    }

    pub fn is_admin(&self) -> bool {
        match self {
            Principal::AdminCredential { .. } => true,
            Principal::UserAccount { is_admin, .. } => *is_admin,
        }
    }
}

/// Utilisateur authentifié (routes protégées côté utilisateur).
/// Les routes à portée propriétaire (annulation, paiement) ont besoin
/// d'un vrai id de la table users, donc un token admin hérité est refusé.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub is_admin: bool,
}

/// Principal avec droits admin (les deux schémas acceptés)
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub principal: Principal,
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

fn forbidden(message: &str) -> Error {
    let response = HttpResponse::Forbidden().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

/// Extrait et vérifie le bearer token, puis résout le principal
fn extract_principal(req: &HttpRequest) -> Result<Principal, Error> {
    let auth_header = match req.headers().get("Authorization") {
        Some(header) => header,
        None => return Err(unauthorized("Token manquant")),
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => return Err(unauthorized("Invalid Authorization header")),
    };

    let token = match auth_str.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return Err(unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)",
            ))
        }
    };

    let claims = match jwt::verify_token(token) {
        Ok(claims) => claims,
        Err(_) => return Err(unauthorized("Token invalide")),
    };

    Ok(Principal::from_claims(claims))
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = extract_principal(req).and_then(|principal| match principal {
            Principal::UserAccount {
                id,
                email,
                is_admin,
            } => Ok(AuthUser {
                user_id: id,
                email,
                is_admin,
            }),
            Principal::AdminCredential { .. } => {
                Err(forbidden("Cette route nécessite un compte utilisateur"))
            }
        });
        ready(result)
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = extract_principal(req).and_then(|principal| {
            if principal.is_admin() {
                Ok(AdminUser { principal })
            } else {
                Err(forbidden("Accès admin requis"))
            }
        });
        ready(result)
    }
}
