//! Outillage d'exploitation : docker compose, sauvegardes, gestion de l'application,
//! lint et installation d'un environnement.

pub mod context;
pub mod install;
pub mod runner;
pub mod secrets;
pub mod style;
pub mod tasks;

pub use context::OpsContext;
pub use runner::{confirm, Runner};
pub use tasks::{group, TaskGroup};
