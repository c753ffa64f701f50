use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statuts autorisés pour un partenaire.
pub const VALID_STATUSES: [&str; 2] = ["active", "inactive"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Le @ public du partenaire
    pub username: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub description: Option<String>,
    pub status: String, // "active" ou "inactive"
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
