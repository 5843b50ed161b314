// utils/mod.rs
pub mod config;
pub mod error;
pub mod helpers;
pub mod security;
pub mod validation;

// Ré-exports pour faciliter l'import
pub use config::Config;
pub use error::{AppError, Result};
pub use helpers::{try_it, TimeIt};
pub use security::{hash_password, verify_password, JwtService, TokenClaims, TokenPair, TokenType};
pub use validation::{validate_not_blank, validate_optional_email, validate_phone_number};
