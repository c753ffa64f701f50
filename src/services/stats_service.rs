// Agrégation des statistiques du tableau de bord. Recalcul complet à chaque
// appel (pas de cache, pas de maintenance incrémentale): on recharge toutes
// les vidéos avec leur propriétaire, on applique le filtre de visibilité,
// puis on compte par statut.
use sea_orm::*;

use crate::models::dto::StatsResponse;
use crate::models::users::{self, Entity as Users};
use crate::models::videos::{self, Entity as Videos, VideoStatus};
use crate::services::visibility::filter_visible;

pub struct StatsService;

impl StatsService {
    /// Comptage par statut sur des vidéos déjà filtrées, plus le nombre de
    /// membres actifs
    pub fn tally(visible_videos: &[videos::Model], members: u64) -> StatsResponse {
        let count = |status: VideoStatus| {
            visible_videos.iter().filter(|v| v.status == status).count() as u64
        };

        StatsResponse {
            total: visible_videos.len() as u64,
            validated: count(VideoStatus::Validated),
            pending: count(VideoStatus::Pending),
            rejected: count(VideoStatus::Rejected),
            members,
        }
    }

    pub async fn compute(db: &DatabaseConnection) -> Result<StatsResponse, DbErr> {
        let rows = Videos::find().find_also_related(Users).all(db).await?;

        let visible: Vec<videos::Model> = filter_visible(rows)
            .into_iter()
            .map(|(video, _)| video)
            .collect();

        let members = Users::find()
            .filter(users::Column::IsBanned.eq(false))
            .count(db)
            .await?;

        Ok(Self::tally(&visible, members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn user(id: i32, is_banned: bool) -> users::Model {
        users::Model {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            is_admin: false,
            is_banned,
            created_at: chrono::Utc::now().naive_utc(),
            last_login: None,
            email_verified: true,
            email_verification_token: None,
            email_verification_expires: None,
            reset_password_token: None,
            reset_password_expires: None,
            payment_method: None,
            paypal_email: None,
            iban_number: None,
            bank_name: None,
            account_holder: None,
            bic_code: None,
            crypto_type: None,
            crypto_address: None,
            full_name: None,
            tax_id: None,
        }
    }

    fn video(id: i32, status: VideoStatus) -> videos::Model {
        videos::Model {
            id,
            title: format!("video {}", id),
            description: None,
            storage_url: format!("/uploads/{}.mp4", id),
            category_id: None,
            status,
            submitted_at: chrono::Utc::now().naive_utc(),
            validated_at: None,
            rejected_at: None,
            rejection_reason: None,
            user_id: Some(1),
            recorded_video: None,
            copyright_ownership: None,
            terms_agreement: None,
            signature: None,
            recorder_email: None,
            owner_email: None,
            user_email: None,
        }
    }

    #[test]
    fn test_tally_counts_by_status() {
        let videos = vec![
            video(1, VideoStatus::Validated),
            video(2, VideoStatus::Validated),
            video(3, VideoStatus::Pending),
            video(4, VideoStatus::Rejected),
        ];

        let stats = StatsService::tally(&videos, 12);
        assert_eq!(
            stats,
            StatsResponse {
                total: 4,
                validated: 2,
                pending: 1,
                rejected: 1,
                members: 12,
            }
        );
    }

    #[test]
    fn test_tally_empty() {
        let stats = StatsService::tally(&[], 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.members, 0);
    }

    #[tokio::test]
    async fn test_compute_hides_banned_owners_and_counts_members() {
        // Deux vidéos validées, une appartenant à un utilisateur banni:
        // seule celle du propriétaire actif doit compter.
        let rows = vec![
            (video(1, VideoStatus::Validated), user(1, false)),
            (video(2, VideoStatus::Validated), user(2, true)),
        ];

        let mut count_row = BTreeMap::new();
        count_row.insert("num_items", Value::BigInt(Some(4)));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .append_query_results([vec![count_row]])
            .into_connection();

        let stats = StatsService::compute(&db).await.unwrap();
        assert_eq!(
            stats,
            StatsResponse {
                total: 1,
                validated: 1,
                pending: 0,
                rejected: 0,
                members: 4,
            }
        );
    }
}
