// Filtre de visibilité: une vidéo n'est montrée que si son propriétaire
// existe et n'est pas banni. Filtre pur et synchrone, appliqué à l'identique
// sur tous les listings (publics comme admin) et sur les statistiques.
//
// Les vidéos sans propriétaire (anciennes soumissions anonymes) sont cachées
// partout — politique unique, voir DESIGN.md.
use crate::models::{users, videos};

pub type VideoWithOwner = (videos::Model, Option<users::Model>);

pub fn is_visible(owner: Option<&users::Model>) -> bool {
    matches!(owner, Some(u) if !u.is_banned)
}

pub fn filter_visible(rows: Vec<VideoWithOwner>) -> Vec<VideoWithOwner> {
    rows.into_iter()
        .filter(|(_, owner)| is_visible(owner.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::videos::VideoStatus;

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

    fn video(id: i32, user_id: Option<i32>) -> videos::Model {
        videos::Model {
            id,
            title: format!("video {}", id),
            description: None,
            storage_url: format!("/uploads/{}.mp4", id),
            category_id: None,
            status: VideoStatus::Validated,
            submitted_at: chrono::Utc::now().naive_utc(),
            validated_at: None,
            rejected_at: None,
            rejection_reason: None,
            user_id,
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
    fn test_visible_owner_kept() {
        assert!(is_visible(Some(&user(1, false))));
    }

    #[test]
    fn test_banned_owner_hidden() {
        assert!(!is_visible(Some(&user(1, true))));
    }

    #[test]
    fn test_ownerless_hidden() {
        assert!(!is_visible(None));
    }

    #[test]
    fn test_filter_narrows_without_mutating() {
        let rows = vec![
            (video(1, Some(1)), Some(user(1, false))),
            (video(2, Some(2)), Some(user(2, true))),
            (video(3, None), None),
        ];
        let filtered = filter_visible(rows);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0.id, 1);
        // Même entrée, même sortie
        let again = filter_visible(vec![(video(1, Some(1)), Some(user(1, false)))]);
        assert_eq!(again.len(), 1);
    }
}
