//! # Domain Models Module
//!
//! Entités métier et ports de persistance.
//!
//! ## Structure
//! - `user.rs`: l'utilisateur authentifié et ses modifications
//! - `ports.rs`: traits implémentés par les adaptateurs de stockage
//!
//! ## Conventions
//! - Le hash du mot de passe n'est jamais sérialisé
//! - Les identifiants utilisent `uuid::Uuid`
//! - Les timestamps utilisent `chrono::DateTime<chrono::Utc>`

pub mod ports;
pub mod user;

pub use ports::{TokenBlacklist, UserStore};
pub use user::{NewUser, User, UserChanges};
