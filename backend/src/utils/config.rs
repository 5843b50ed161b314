// utils/config.rs
use crate::utils::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // Environnement et serveur
    pub env: String,
    pub server_host: String,
    pub server_port: u16,
    pub workers: usize,
    pub log_level: String,
    pub log_format: String,

    // Base de données
    pub database_url: String,
    pub database_max_connections: u32,

    // Sécurité
    pub secret_key: String,
    pub jwt_signing_key: String,
    pub jwt_payload_encryption_key: String,
    pub access_token_lifetime_hours: i64,
    pub refresh_token_lifetime_hours: i64,

    // API
    pub page_size: i64,
    pub cors_allow_all_origins: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    ///
    /// `.env` puis `environments/<ENV>/app.env` sont chargés s'ils existent ;
    /// les variables déjà présentes dans l'environnement restent prioritaires.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let env_name = env::var("ENV").unwrap_or_else(|_| "development".to_string());
        let env_file = PathBuf::from("environments").join(&env_name).join("app.env");
        if dotenv::from_path(&env_file).is_ok() {
            tracing::debug!(path = %env_file.display(), "environment file loaded");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration à partir d'une source de variables quelconque
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("SECRET_KEY is required".to_string()))?;

        let config = Config {
            env: lookup("ENV").unwrap_or_else(|| "development".to_string()),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_var(&lookup, "SERVER_PORT", 8000)?,
            workers: parse_var(&lookup, "WORKERS", 4)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "json".to_string()),

            database_url: lookup("DATABASE_URL")
                .or_else(|| lookup("DB_URL"))
                .unwrap_or_else(|| "memory://".to_string()),
            database_max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,

            jwt_signing_key: lookup("JWT_SIGNING_KEY").unwrap_or_else(|| secret_key.clone()),
            jwt_payload_encryption_key: lookup("JWT_PAYLOAD_ENCRYPTION_KEY")
                .unwrap_or_else(|| secret_key.clone()),
            secret_key,
            access_token_lifetime_hours: parse_var(&lookup, "ACCESS_TOKEN_LIFETIME", 2)?,
            refresh_token_lifetime_hours: parse_var(&lookup, "REFRESH_TOKEN_LIFETIME", 24 * 30)?,

            page_size: parse_var(&lookup, "PAGE_SIZE", 10)?,
            cors_allow_all_origins: parse_bool(&lookup, "CORS_ALLOW_ALL_ORIGINS", true)?,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if config.page_size <= 0 {
            return Err(AppError::Config("PAGE_SIZE must be positive".to_string()));
        }

        Ok(config)
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    /// Base de données en mémoire (développement et tests)
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number", name))),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, name: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off" | "") => Ok(false),
        Some(_) => Err(AppError::Config(format!("{} must be a boolean", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn secret_key_is_required() {
        assert!(matches!(config_from(&[]), Err(AppError::Config(_))));
    }

    #[test]
    fn jwt_keys_fall_back_to_secret_key() {
        let config = config_from(&[("SECRET_KEY", "s3cret")]).unwrap();
        assert_eq!(config.jwt_signing_key, "s3cret");
        assert_eq!(config.jwt_payload_encryption_key, "s3cret");
        assert_eq!(config.access_token_lifetime_hours, 2);
        assert_eq!(config.refresh_token_lifetime_hours, 720);
        assert_eq!(config.page_size, 10);
        assert!(config.uses_memory_store());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("SECRET_KEY", "s3cret"),
            ("JWT_SIGNING_KEY", "signing"),
            ("ACCESS_TOKEN_LIFETIME", "5"),
            ("DATABASE_URL", "postgres://app@db/app"),
            ("CORS_ALLOW_ALL_ORIGINS", "false"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.jwt_signing_key, "signing");
        assert_eq!(config.access_token_lifetime_hours, 5);
        assert!(!config.uses_memory_store());
        assert!(!config.cors_allow_all_origins);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = config_from(&[("SECRET_KEY", "s"), ("SERVER_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }
}
