// Gestion des catégories. La suppression détache d'abord les vidéos qui la
// référencent (category_id = NULL) puis supprime la catégorie, le tout dans
// une transaction: pas d'état intermédiaire visible en cas d'échec.
use sea_orm::sea_query::Expr;
use sea_orm::*;
use thiserror::Error;

use crate::models::categories::{self, Entity as Categories};
use crate::models::videos::{self, Entity as Videos};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Catégorie non trouvée.")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub struct CategoryService;

impl CategoryService {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        description: Option<String>,
    ) -> Result<categories::Model, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Validation(
                "Le nom de la catégorie est requis.".to_string(),
            ));
        }

        let category = categories::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            ..Default::default()
        };

        Ok(category.insert(db).await?)
    }

    /// Renomme une catégorie; les vidéos la référencent par id, rien d'autre
    /// à mettre à jour
    pub async fn rename(
        db: &DatabaseConnection,
        category_id: i32,
        name: &str,
    ) -> Result<categories::Model, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::Validation(
                "Le nom de la catégorie est requis.".to_string(),
            ));
        }

        let category = Categories::find_by_id(category_id)
            .one(db)
            .await?
            .ok_or(CategoryError::NotFound)?;

        let mut active: categories::ActiveModel = category.into();
        active.name = Set(name.to_string());

        Ok(active.update(db).await?)
    }

    /// Supprime une catégorie après avoir détaché toutes les vidéos qui la
    /// référencent. Retourne le nombre de vidéos détachées.
    pub async fn delete_with_detach(
        db: &DatabaseConnection,
        category_id: i32,
    ) -> Result<u64, CategoryError> {
        let txn = db.begin().await?;

        let category = Categories::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or(CategoryError::NotFound)?;

        let detached = Videos::update_many()
            .col_expr(videos::Column::CategoryId, Expr::value(Value::Int(None)))
            .filter(videos::Column::CategoryId.eq(category_id))
            .exec(&txn)
            .await?
            .rows_affected;

        category.delete(&txn).await?;

        txn.commit().await?;
        Ok(detached)
    }

    /// Liste admin: chaque catégorie avec le nombre de vidéos qui l'utilisent
    pub async fn list_with_counts(
        db: &DatabaseConnection,
    ) -> Result<Vec<(categories::Model, u64)>, CategoryError> {
        let categories = Categories::find().all(db).await?;

        let mut out = Vec::with_capacity(categories.len());
        for category in categories {
            let video_count = Videos::find()
                .filter(videos::Column::CategoryId.eq(category.id))
                .count(db)
                .await?;
            out.push((category, video_count));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn category(id: i32, name: &str) -> categories::Model {
        categories::Model {
            id,
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_delete_detaches_referencing_videos() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category(5, "Chats")]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3, // 3 vidéos détachées
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1, // la catégorie elle-même
                },
            ])
            .into_connection();

        let detached = CategoryService::delete_with_detach(&db, 5).await.unwrap();
        assert_eq!(detached, 3);
    }

    #[tokio::test]
    async fn test_delete_unknown_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<categories::Model>::new()])
            .into_connection();

        let err = CategoryService::delete_with_detach(&db, 99).await.unwrap_err();
        assert!(matches!(err, CategoryError::NotFound));
    }

    #[tokio::test]
    async fn test_rename_requires_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = CategoryService::rename(&db, 1, "   ").await.unwrap_err();
        assert!(matches!(err, CategoryError::Validation(_)));
    }
}
