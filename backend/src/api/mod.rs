pub mod pagination;
pub mod routes;
#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{error, web, HttpResponse, Responder};

use crate::core::{AuthService, UserService};
use crate::infrastructure::Stores;
use crate::utils::config::Config;
use crate::utils::error::AppError;
use crate::utils::security::JwtService;

/// État partagé par tous les handlers
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub auth: AuthService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, stores: &Stores) -> Self {
        let jwt = JwtService::from_config(&config);
        Self {
            users: UserService::new(stores.users.clone()),
            auth: AuthService::new(stores.users.clone(), stores.blacklist.clone(), jwt),
            config: Arc::new(config),
        }
    }
}

/// Configure toutes les routes de l'API
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::field("non_field_errors", err.to_string()))
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::field("non_field_errors", err.to_string()))
    }));

    cfg.service(
        web::scope("/api/v1")
            // Authentification
            .service(routes::auth::obtain_token)
            .service(routes::auth::refresh_token)
            .service(routes::auth::verify_token)
            .service(routes::auth::signup)
            // Utilisateurs : `me` avant `{id}`
            .service(routes::users::list_users)
            .service(routes::users::me)
            .service(routes::users::update_me)
            .service(routes::users::retrieve_user)
            .service(routes::users::update_user)
            .service(routes::users::replace_user)
            .configure(crate::apps::config),
    );

    // Endpoint de santé
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

/// Endpoint de santé pour monitoring
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// CORS : toutes les origines, ou la liste `ALLOWED_ORIGINS`
pub fn cors(config: &Config) -> Cors {
    if config.cors_allow_all_origins {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
    }

    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
