use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: DateTime,
    pub last_login: Option<DateTime>,

    // Vérification email (token UUID, expire après 24h)
    pub email_verified: bool,
    pub email_verification_token: Option<String>,
    pub email_verification_expires: Option<DateTime>,

    // Reset password (token UUID, expire après 1h)
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime>,

    // Informations de paiement (méthode + champs spécifiques)
    pub payment_method: Option<String>, // "paypal", "iban", "crypto"
    pub paypal_email: Option<String>,
    pub iban_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder: Option<String>,
    pub bic_code: Option<String>,
    pub crypto_type: Option<String>, // "btc", "eth", "sol", "usdt", "usdc"
    pub crypto_address: Option<String>,
    pub full_name: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::videos::Entity")]
    Videos,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
