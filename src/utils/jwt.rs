use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

/// Origine des identifiants du principal.
/// Les deux chemins de connexion (table admins héritée, table users)
/// produisent la même forme de claims; seul `kind` les distingue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Admin,
    User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id ou admin_id selon kind
    pub email: String,
    pub is_admin: bool,
    pub kind: PrincipalKind,
    pub exp: i64, // expiration timestamp
}

/// Récupère la clé secrète JWT depuis les variables d'environnement
fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        log::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
        "default-insecure-key-change-this".to_string()
    })
}

/// Génère un JWT valable 24h pour un principal (admin ou utilisateur)
pub fn generate_token(
    sub: i32,
    email: &str,
    is_admin: bool,
    kind: PrincipalKind,
) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub,
        email: email.to_string(),
        is_admin,
        kind,
        exp: expiration,
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_user_token() {
        let token = generate_token(42, "user@example.com", false, PrincipalKind::User).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "user@example.com");
        assert!(!claims.is_admin);
        assert_eq!(claims.kind, PrincipalKind::User);
    }

    #[test]
    fn test_admin_token_carries_flag() {
        let token = generate_token(1, "admin", true, PrincipalKind::Admin).unwrap();
        let claims = verify_token(&token).unwrap();

        assert!(claims.is_admin);
        assert_eq!(claims.kind, PrincipalKind::Admin);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_token(7, "user@example.com", false, PrincipalKind::User).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('a') { 'b' } else { 'a' });
        assert!(verify_token(&tampered).is_err());
    }
}
