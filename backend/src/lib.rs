// backend/src/lib.rs
// Modules principaux
pub mod api;
pub mod apps;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod ops;
pub mod utils;

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "REST Boilerplate";
