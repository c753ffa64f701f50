// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - videos : Vidéos soumises (workflow pending/validated/rejected)
//   - categories : Catégories de vidéos
//   - users : Utilisateurs (ban, vérification email, reset password, paiement)
//   - partners : Partenaires affichés sur la vitrine (active/inactive)
//   - admins : Identifiants admin hérités (coexiste avec users.is_admin)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - videos.user_id est nullable (anciennes soumissions anonymes)
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod admins;
pub mod categories;
pub mod dto;
pub mod health;
pub mod partners;
pub mod users;
pub mod videos;
