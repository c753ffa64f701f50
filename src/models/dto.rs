// DTOs partagés pour les réponses API.
// Le format wire reprend celui du front existant (camelCase).
use serde::Serialize;

use super::{categories, users, videos};
use crate::models::videos::VideoStatus;

/// Profil public d'un utilisateur (jamais le hash, jamais les tokens)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: chrono::NaiveDateTime,
    pub last_login: Option<chrono::NaiveDateTime>,
}

impl From<&users::Model> for PublicUser {
    fn from(u: &users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            is_admin: u.is_admin,
            is_banned: u.is_banned,
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

impl From<&categories::Model> for CategoryRef {
    fn from(c: &categories::Model) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
        }
    }
}

/// Propriétaire embarqué dans une réponse vidéo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOwner {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_banned: bool,
}

/// Une vidéo telle qu'exposée par l'API, catégorie et propriétaire résolus.
/// Les anciens enregistrements sans champs copyright reçoivent les
/// valeurs par défaut attendues par le front.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub storage_url: String,
    pub status: VideoStatus,
    pub submitted_at: chrono::NaiveDateTime,
    pub validated_at: Option<chrono::NaiveDateTime>,
    pub rejected_at: Option<chrono::NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub category: Option<CategoryRef>,
    pub user: Option<VideoOwner>,
    pub recorded_video: String,
    pub copyright_ownership: String,
    pub terms_agreement: bool,
    pub signature: String,
    pub recorder_email: Option<String>,
    pub owner_email: Option<String>,
}

impl VideoResponse {
    pub fn build(
        video: &videos::Model,
        owner: Option<&users::Model>,
        category: Option<&categories::Model>,
    ) -> Self {
        Self {
            id: video.id,
            title: video.title.clone(),
            description: video.description.clone(),
            storage_url: video.storage_url.clone(),
            status: video.status,
            submitted_at: video.submitted_at,
            validated_at: video.validated_at,
            rejected_at: video.rejected_at,
            rejection_reason: video.rejection_reason.clone(),
            category: category.map(CategoryRef::from),
            user: owner.map(|u| VideoOwner {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                is_banned: u.is_banned,
            }),
            recorded_video: video.recorded_video.clone().unwrap_or_else(|| "no".to_string()),
            copyright_ownership: video
                .copyright_ownership
                .clone()
                .unwrap_or_else(|| "no".to_string()),
            terms_agreement: video.terms_agreement.unwrap_or(true),
            signature: video
                .signature
                .clone()
                .unwrap_or_else(|| "Non spécifié".to_string()),
            recorder_email: video.recorder_email.clone(),
            owner_email: video.owner_email.clone(),
        }
    }
}

/// Vue réduite d'une vidéo, pour les listes par utilisateur côté admin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBrief {
    pub id: i32,
    pub title: String,
    pub status: VideoStatus,
    pub submitted_at: chrono::NaiveDateTime,
}

impl From<&videos::Model> for VideoBrief {
    fn from(v: &videos::Model) -> Self {
        Self {
            id: v.id,
            title: v.title.clone(),
            status: v.status,
            submitted_at: v.submitted_at,
        }
    }
}

/// Informations de paiement d'un utilisateur (méthode + champs spécifiques)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
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

impl PaymentInfo {
    /// None tant que l'utilisateur n'a pas enregistré de méthode
    pub fn from_user(u: &users::Model) -> Option<Self> {
        u.payment_method.as_ref().map(|method| Self {
            payment_method: method.clone(),
            paypal_email: u.paypal_email.clone(),
            iban_number: u.iban_number.clone(),
            bank_name: u.bank_name.clone(),
            account_holder: u.account_holder.clone(),
            bic_code: u.bic_code.clone(),
            crypto_type: u.crypto_type.clone(),
            crypto_address: u.crypto_address.clone(),
            full_name: u.full_name.clone(),
            tax_id: u.tax_id.clone(),
        })
    }
}

/// Réponse de GET /api/videos/stats
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub total: u64,
    pub validated: u64,
    pub pending: u64,
    pub rejected: u64,
    pub members: u64,
}
