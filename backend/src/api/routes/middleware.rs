//! # Authentification des requêtes
//!
//! `CurrentUser` extrait l'utilisateur porteur d'un access token
//! (`Authorization: Bearer <token>`).
//!
//! - sans en-tête, ou avec un autre schéma : 403
//! - token invalide, expiré, ou utilisateur inactif : 401

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures_util::future::{FutureExt, LocalBoxFuture};

use crate::{api::AppState, domain::User, utils::error::AppError};

const BEARER: &str = "Bearer";

/// Extension pour obtenir l'utilisateur courant
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Token porté par l'en-tête `Authorization`, s'il utilise le schéma Bearer
fn bearer_token(req: &HttpRequest) -> Result<Option<String>, AppError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::InvalidToken("Invalid Authorization header".to_string()))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Ok(None),
        (Some(scheme), _, _) if scheme != BEARER => Ok(None),
        (Some(_), Some(token), None) => Ok(Some(token.to_string())),
        (Some(_), None, _) => Err(AppError::InvalidToken(
            "Invalid Authorization header. No credentials provided.".to_string(),
        )),
        _ => Err(AppError::InvalidToken(
            "Invalid Authorization header. Credentials string should not contain spaces."
                .to_string(),
        )),
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        async move {
            let state = state.ok_or(AppError::Internal)?;
            let token = token?.ok_or(AppError::NotAuthenticated)?;
            let user = state.auth.authenticate_access(&token).await?;
            Ok(CurrentUser(user))
        }
        .boxed_local()
    }
}
