// core/mod.rs
pub mod auth_service;
pub mod user_service;

// Ré-exports pour faciliter l'import
pub use auth_service::AuthService;
pub use user_service::{Listing, UserService};
