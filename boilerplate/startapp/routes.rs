use actix_web::{get, HttpResponse};
use serde::Serialize;

use crate::api::routes::middleware::CurrentUser;
use crate::utils::error::Result;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
}

/// Point d'entrée de l'application, réservé aux utilisateurs authentifiés
#[get("/app/")]
pub async fn index(user: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(IndexResponse {
        message: format!("Hello, {}", user.0.short_name()),
    }))
}
