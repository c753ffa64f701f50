use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Table d'identifiants admin héritée de l'ancienne version.
/// Coexiste avec users.is_admin; les deux chemins de connexion
/// produisent les mêmes claims (voir utils::jwt).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
