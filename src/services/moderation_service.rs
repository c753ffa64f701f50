// Workflow de modération des vidéos.
//
// Machine à états: pending → validated ou pending → rejected.
// Les transitions ne sont permises que depuis l'état pending: re-valider ou
// re-rejeter une vidéo déjà traitée est refusé (invalid state). L'annulation
// par l'utilisateur et la suppression admin sont des hard deletes.
use chrono::Utc;
use sea_orm::*;
use thiserror::Error;

use crate::models::categories::Entity as Categories;
use crate::models::videos::{self, Entity as Videos, VideoStatus};

/// Raison enregistrée quand l'admin rejette sans en donner une
pub const DEFAULT_REJECTION_REASON: &str = "Vidéo rejetée par l'administrateur";

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Vidéo non trouvée.")]
    NotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Une vidéo ne peut être validée ou rejetée que depuis l'état pending
pub fn is_moderatable(status: VideoStatus) -> bool {
    status == VideoStatus::Pending
}

pub struct ModerationService;

impl ModerationService {
    /// Valide une vidéo en attente et horodate la décision
    pub async fn validate(
        db: &DatabaseConnection,
        video_id: i32,
    ) -> Result<videos::Model, ModerationError> {
        let video = Videos::find_by_id(video_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound)?;

        if !is_moderatable(video.status) {
            return Err(ModerationError::InvalidState(
                "Seules les vidéos en attente peuvent être validées.".to_string(),
            ));
        }

        let mut active: videos::ActiveModel = video.into();
        active.status = Set(VideoStatus::Validated);
        active.validated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(db).await?)
    }

    /// Rejette une vidéo en attente; sans raison fournie, la raison par
    /// défaut est enregistrée
    pub async fn reject(
        db: &DatabaseConnection,
        video_id: i32,
        reason: Option<String>,
    ) -> Result<videos::Model, ModerationError> {
        let video = Videos::find_by_id(video_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound)?;

        if !is_moderatable(video.status) {
            return Err(ModerationError::InvalidState(
                "Seules les vidéos en attente peuvent être rejetées.".to_string(),
            ));
        }

        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string());

        let mut active: videos::ActiveModel = video.into();
        active.status = Set(VideoStatus::Rejected);
        active.rejected_at = Set(Some(Utc::now().naive_utc()));
        active.rejection_reason = Set(Some(reason));

        Ok(active.update(db).await?)
    }

    /// Annulation par l'utilisateur: propriétaire uniquement, et seulement
    /// tant que la vidéo est en attente. Supprime l'enregistrement.
    pub async fn cancel(
        db: &DatabaseConnection,
        video_id: i32,
        requester_id: i32,
    ) -> Result<(), ModerationError> {
        let video = Videos::find_by_id(video_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound)?;

        if video.user_id != Some(requester_id) {
            return Err(ModerationError::Forbidden(
                "Vous ne pouvez annuler que vos propres vidéos.".to_string(),
            ));
        }

        if video.status != VideoStatus::Pending {
            return Err(ModerationError::InvalidState(
                "Vous ne pouvez annuler que les vidéos en attente.".to_string(),
            ));
        }

        Videos::delete_by_id(video_id).exec(db).await?;
        Ok(())
    }

    /// Change la catégorie d'une vidéo (None pour la retirer).
    /// Indépendant du statut.
    pub async fn set_category(
        db: &DatabaseConnection,
        video_id: i32,
        category_id: Option<i32>,
    ) -> Result<videos::Model, ModerationError> {
        let video = Videos::find_by_id(video_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound)?;

        if let Some(id) = category_id {
            let exists = Categories::find_by_id(id).one(db).await?.is_some();
            if !exists {
                return Err(ModerationError::InvalidState(
                    "Cette catégorie n'existe pas.".to_string(),
                ));
            }
        }

        let mut active: videos::ActiveModel = video.into();
        active.category_id = Set(category_id);

        Ok(active.update(db).await?)
    }

    /// Suppression admin, valable quel que soit le statut
    pub async fn delete(db: &DatabaseConnection, video_id: i32) -> Result<(), ModerationError> {
        let video = Videos::find_by_id(video_id)
            .one(db)
            .await?
            .ok_or(ModerationError::NotFound)?;

        Videos::delete_by_id(video.id).exec(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn video(id: i32, status: VideoStatus, user_id: Option<i32>) -> videos::Model {
        videos::Model {
            id,
            title: "Cat Fail #3".to_string(),
            description: None,
            storage_url: "/uploads/cat-fail-3.mp4".to_string(),
            category_id: None,
            status,
            submitted_at: chrono::Utc::now().naive_utc(),
            validated_at: None,
            rejected_at: None,
            rejection_reason: None,
            user_id,
            recorded_video: Some("yes".to_string()),
            copyright_ownership: Some("yes".to_string()),
            terms_agreement: Some(true),
            signature: Some("Jean Dupont".to_string()),
            recorder_email: None,
            owner_email: None,
            user_email: None,
        }
    }

    #[test]
    fn test_only_pending_is_moderatable() {
        assert!(is_moderatable(VideoStatus::Pending));
        assert!(!is_moderatable(VideoStatus::Validated));
        assert!(!is_moderatable(VideoStatus::Rejected));
    }

    #[tokio::test]
    async fn test_validate_pending_video() {
        let mut validated = video(1, VideoStatus::Validated, Some(7));
        validated.validated_at = Some(chrono::Utc::now().naive_utc());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(1, VideoStatus::Pending, Some(7))]])
            .append_query_results([vec![validated]])
            .into_connection();

        let result = ModerationService::validate(&db, 1).await.unwrap();
        assert_eq!(result.status, VideoStatus::Validated);
        assert!(result.validated_at.is_some());
    }

    #[tokio::test]
    async fn test_validate_already_terminal_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(1, VideoStatus::Rejected, Some(7))]])
            .into_connection();

        let err = ModerationService::validate(&db, 1).await.unwrap_err();
        assert!(matches!(err, ModerationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_validate_missing_video() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<videos::Model>::new()])
            .into_connection();

        let err = ModerationService::validate(&db, 99).await.unwrap_err();
        assert!(matches!(err, ModerationError::NotFound));
    }

    #[tokio::test]
    async fn test_reject_records_default_reason() {
        let mut rejected = video(2, VideoStatus::Rejected, Some(7));
        rejected.rejection_reason = Some(DEFAULT_REJECTION_REASON.to_string());
        rejected.rejected_at = Some(chrono::Utc::now().naive_utc());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(2, VideoStatus::Pending, Some(7))]])
            .append_query_results([vec![rejected]])
            .into_connection();

        let result = ModerationService::reject(&db, 2, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(
            result.rejection_reason.as_deref(),
            Some(DEFAULT_REJECTION_REASON)
        );
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(3, VideoStatus::Pending, Some(7))]])
            .into_connection();

        let err = ModerationService::cancel(&db, 3, 8).await.unwrap_err();
        assert!(matches!(err, ModerationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_cancel_rejects_ownerless_video() {
        // Vidéo anonyme héritée: personne ne peut l'annuler
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(3, VideoStatus::Pending, None)]])
            .into_connection();

        let err = ModerationService::cancel(&db, 3, 8).await.unwrap_err();
        assert!(matches!(err, ModerationError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_cancel_requires_pending_state() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(3, VideoStatus::Validated, Some(7))]])
            .into_connection();

        let err = ModerationService::cancel(&db, 3, 7).await.unwrap_err();
        assert!(matches!(err, ModerationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_cancel_deletes_owned_pending_video() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![video(3, VideoStatus::Pending, Some(7))]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        assert!(ModerationService::cancel(&db, 3, 7).await.is_ok());
    }
}
