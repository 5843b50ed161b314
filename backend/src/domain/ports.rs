//! Ports de persistance
//!
//! Les services métier ne dépendent que de ces traits ; les adaptateurs
//! PostgreSQL et mémoire vivent dans `infrastructure`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::User;
use crate::utils::error::Result;

/// Stockage des utilisateurs
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insère un utilisateur ; un numéro déjà pris est une erreur de validation
    async fn insert(&self, user: &User) -> Result<()>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>>;

    /// Vrai si un autre utilisateur que `exclude` possède ce numéro
    async fn phone_taken(&self, phone_number: &str, exclude: Option<Uuid>) -> Result<bool>;

    /// Enregistre toutes les colonnes modifiables de l'utilisateur
    async fn update(&self, user: &User) -> Result<()>;
}

/// Liste noire des refresh tokens déjà utilisés
#[async_trait::async_trait]
pub trait TokenBlacklist: Send + Sync {
    async fn blacklist(&self, jti: &str, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<()>;

    async fn is_blacklisted(&self, jti: &str) -> Result<bool>;

    /// Supprime les entrées dont le token a expiré avant `now` ; retourne leur nombre
    async fn flush_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}
