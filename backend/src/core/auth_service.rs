// core/auth_service.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{TokenBlacklist, User, UserStore};
use crate::utils::error::{AppError, Result};
use crate::utils::security::{
    dummy_password_hash, verify_password, JwtService, TokenClaims, TokenPair, TokenType,
};

/// Authentification par tokens JWT (obtention, rotation, vérification)
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    blacklist: Arc<dyn TokenBlacklist>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, blacklist: Arc<dyn TokenBlacklist>, jwt: JwtService) -> Self {
        Self {
            users,
            blacklist,
            jwt,
        }
    }

    /// Échanger un numéro de téléphone et un mot de passe contre une paire de tokens
    pub async fn obtain_pair(&self, phone_number: &str, password: &str) -> Result<TokenPair> {
        let Some(user) = self.users.get_by_phone(phone_number).await? else {
            // Même coût qu'une vérification réelle pour un numéro inconnu
            verify_password(password, dummy_password_hash());
            return Err(AppError::InvalidCredentials);
        };
        if !(user.check_password(password) && user.is_active) {
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = %user.id, "token pair obtained");
        self.jwt.issue_pair(&user)
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        self.jwt.issue_pair(user)
    }

    /// Rotation : le refresh token utilisé est mis en liste noire
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.jwt.decode_typed(refresh_token, TokenType::Refresh)?;
        self.ensure_not_blacklisted(&claims).await?;

        let user = self.active_user(&claims).await?;
        let pair = self.jwt.issue_pair(&user)?;

        self.blacklist
            .blacklist(&claims.jti, claims.user_id, claims.expires_at())
            .await?;

        debug!(user_id = %user.id, jti = %claims.jti, "refresh token rotated");
        Ok(pair)
    }

    /// Vérifier un token quelconque (signature, expiration, liste noire)
    pub async fn verify(&self, token: &str) -> Result<()> {
        let claims = self.jwt.decode(token)?;
        self.ensure_not_blacklisted(&claims).await
    }

    /// Résoudre l'utilisateur porteur d'un access token
    pub async fn authenticate_access(&self, token: &str) -> Result<User> {
        let claims = self.jwt.decode_typed(token, TokenType::Access)?;
        self.active_user(&claims).await
    }

    /// Purge des refresh tokens expirés de la liste noire
    pub async fn flush_expired_tokens(&self) -> Result<u64> {
        let removed = self.blacklist.flush_expired(Utc::now()).await?;
        info!(removed, "expired tokens flushed");
        Ok(removed)
    }

    async fn ensure_not_blacklisted(&self, claims: &TokenClaims) -> Result<()> {
        if self.blacklist.is_blacklisted(&claims.jti).await? {
            return Err(AppError::InvalidToken("Token is blacklisted".to_string()));
        }
        Ok(())
    }

    async fn active_user(&self, claims: &TokenClaims) -> Result<User> {
        match self.users.get_by_id(claims.user_id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(AppError::InvalidToken("User is inactive".to_string())),
            None => Err(AppError::InvalidToken("User not found".to_string())),
        }
    }
}
