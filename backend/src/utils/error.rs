// utils/error.rs
use std::collections::BTreeMap;

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Erreurs par champ, dans le format renvoyé au client
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

#[derive(Error, Debug)]
pub enum AppError {
    // Erreurs d'authentification
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Forbidden(String),

    // Erreurs de données
    #[error("Validation error")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    // Erreurs internes
    #[error("Database error: {0}")]
    Database(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Erreur de validation portant sur un seul champ
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    pub fn not_found() -> Self {
        AppError::NotFound("Not found.".to_string())
    }

    pub fn token_invalid() -> Self {
        AppError::InvalidToken("Token is invalid or expired".to_string())
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "BAD_REQUEST",
            AppError::InvalidCredentials | AppError::InvalidToken(_) => "UNAUTHORIZED",
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            // Sans identifiants, aucune méthode d'authentification n'est annoncée : 403
            AppError::NotAuthenticated | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::EncryptionError(_)
            | AppError::Config(_)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::Validation(details) => builder.json(json!({
                "error": self.to_string(),
                "code": self.code(),
                "details": details,
            })),
            AppError::InvalidCredentials | AppError::InvalidToken(_) => builder
                .insert_header((header::WWW_AUTHENTICATE, "Bearer realm=\"api\""))
                .json(json!({
                    "error": self.to_string(),
                    "code": self.code(),
                })),
            AppError::Database(_)
            | AppError::EncryptionError(_)
            | AppError::Config(_)
            | AppError::Internal => {
                tracing::error!(error = %self, "internal server error");
                builder.json(json!({
                    "error": "Internal server error",
                    "code": self.code(),
                }))
            }
            _ => builder.json(json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::not_found(),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::token_invalid()
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::EncryptionError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::EncryptionError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        AppError::Validation(details)
    }
}

// Type de résultat standard
pub type Result<T> = std::result::Result<T, AppError>;
