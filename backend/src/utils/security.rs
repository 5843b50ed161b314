// utils/security.rs
use crate::domain::User;
use crate::utils::config::Config;
use crate::utils::error::{AppError, Result};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use uuid::Uuid;

const NONCE_LEN: usize = 12;

/// Type de token JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims JWT communs aux tokens d'accès et de rafraîchissement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub token_type: TokenType,
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    /// Données publiques de l'utilisateur
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub public: Map<String, Value>,
    /// Données privées chiffrées (AES-256-GCM, hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

/// Paire de tokens renvoyée au client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Émission et vérification des tokens JWT
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    payload_key: [u8; 32],
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl JwtService {
    pub fn new(
        signing_key: &str,
        payload_encryption_key: &str,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            encoding: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(signing_key.as_bytes()),
            payload_key: Sha256::digest(payload_encryption_key.as_bytes()).into(),
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_signing_key,
            &config.jwt_payload_encryption_key,
            Duration::hours(config.access_token_lifetime_hours),
            Duration::hours(config.refresh_token_lifetime_hours),
        )
    }

    /// Générer une paire access/refresh pour un utilisateur
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user, TokenType::Access)?,
            refresh: self.issue(user, TokenType::Refresh)?,
        })
    }

    /// Générer un token du type demandé
    pub fn issue(&self, user: &User, token_type: TokenType) -> Result<String> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime,
            TokenType::Refresh => self.refresh_lifetime,
        };

        let private = user.private_jwt_data();
        let claims = TokenClaims {
            token_type,
            user_id: user.id,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
            public: user.public_jwt_data(),
            private: if private.is_empty() {
                None
            } else {
                Some(self.encrypt_payload(&private)?)
            },
        };

        self.encode_claims(&claims)
    }

    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::EncryptionError(e.to_string()))
    }

    /// Vérifier la signature et l'expiration d'un token, quel que soit son type
    pub fn decode(&self, token: &str) -> Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    /// Vérifier un token et son type
    pub fn decode_typed(&self, token: &str, expected: TokenType) -> Result<TokenClaims> {
        let claims = self.decode(token)?;
        if claims.token_type != expected {
            return Err(AppError::InvalidToken("Token has wrong type".to_string()));
        }
        Ok(claims)
    }

    /// Chiffrer les données privées embarquées dans le token
    pub fn encrypt_payload(&self, payload: &Map<String, Value>) -> Result<String> {
        let cipher = Aes256Gcm::new_from_slice(&self.payload_key)
            .map_err(|e| AppError::EncryptionError(e.to_string()))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let plaintext = serde_json::to_vec(payload)?;

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|e| AppError::EncryptionError(e.to_string()))?;

        let mut out = nonce.to_vec();
        out.extend_from_slice(&ciphertext);
        Ok(hex::encode(out))
    }

    /// Déchiffrer les données privées d'un token
    pub fn decrypt_payload(&self, encoded: &str) -> Result<Map<String, Value>> {
        let raw = hex::decode(encoded).map_err(|e| AppError::EncryptionError(e.to_string()))?;
        if raw.len() <= NONCE_LEN {
            return Err(AppError::EncryptionError("payload too short".to_string()));
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(&self.payload_key)
            .map_err(|e| AppError::EncryptionError(e.to_string()))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| AppError::EncryptionError(e.to_string()))?;

        Ok(serde_json::from_slice(&plaintext)?)
    }
}

/// Générer un hash de mot de passe avec Argon2
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };

    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::EncryptionError(e.to_string()))
}

/// Hash de référence vérifié quand l'utilisateur est inconnu
pub fn dummy_password_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("unusable-password").unwrap_or_default())
}

/// Vérifier un mot de passe contre un hash
///
/// Un hash vide ou illisible ne valide jamais.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    if hash.is_empty() {
        return false;
    }

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
