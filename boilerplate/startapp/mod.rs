//! Nouvelle application.
//!
//! Déclarer le module dans `apps/mod.rs` puis appeler `config` depuis `apps::config`.

pub mod routes;

use actix_web::web;

/// Routes de l'application, montées sous `/api/v1`
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::index);
}
