use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statut de modération d'une vidéo.
/// Machine à états: pending → validated ou pending → rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "validated")]
    Validated,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// URL durable du fichier (Cloudinary ou /uploads/... en local)
    pub storage_url: String,
    pub category_id: Option<i32>,
    pub status: VideoStatus,
    pub submitted_at: DateTime,
    pub validated_at: Option<DateTime>,
    pub rejected_at: Option<DateTime>,
    pub rejection_reason: Option<String>,
    /// Nullable: les anciennes soumissions anonymes n'ont pas de propriétaire
    pub user_id: Option<i32>,

    // Attestation droits d'auteur ("yes"/"no" pour les deux premiers)
    pub recorded_video: Option<String>,
    pub copyright_ownership: Option<String>,
    pub terms_agreement: Option<bool>,
    pub signature: Option<String>,
    pub recorder_email: Option<String>,
    pub owner_email: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
