//! Applications générées avec `ops dj startapp <name>`.
//!
//! Chaque application déclare ici son module puis ses routes dans [`config`].

use actix_web::web;

/// Routes des applications, montées sous `/api/v1`
pub fn config(_cfg: &mut web::ServiceConfig) {}
