use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{routes::users::UserResponse, routes::Body, AppState},
    domain::NewUser,
    utils::error::Result,
    utils::security::TokenPair,
    utils::validation::{validate_not_blank, validate_optional_email, validate_phone_number},
};

/// Requête d'obtention d'une paire de tokens
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ObtainTokenRequest {
    #[validate(required(message = "This field is required."), custom = "validate_not_blank")]
    pub phone_number: Option<String>,
    #[validate(required(message = "This field is required."), custom = "validate_not_blank")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(required(message = "This field is required."), custom = "validate_not_blank")]
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(required(message = "This field is required."), custom = "validate_not_blank")]
    pub token: Option<String>,
}

/// Requête pour l'inscription
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(required(message = "This field is required."), custom = "validate_phone_number")]
    pub phone_number: Option<String>,
    #[validate(required(message = "This field is required."), custom = "validate_not_blank")]
    pub password: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom = "validate_not_blank",
        length(max = 64, message = "Ensure this field has no more than 64 characters.")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom = "validate_not_blank",
        length(max = 64, message = "Ensure this field has no more than 64 characters.")
    )]
    pub last_name: Option<String>,
    #[validate(
        custom = "validate_optional_email",
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,
}

impl From<SignupRequest> for NewUser {
    fn from(req: SignupRequest) -> Self {
        NewUser {
            phone_number: req.phone_number,
            password: req.password,
            email: req.email,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            ..NewUser::default()
        }
    }
}

/// Utilisateur créé, accompagné de sa première paire de tokens
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: TokenPair,
}

#[post("/auth/token/obtain/")]
pub async fn obtain_token(
    state: web::Data<AppState>,
    body: Body<ObtainTokenRequest>,
) -> Result<HttpResponse> {
    let credentials = body.into_inner();
    credentials.validate()?;

    let pair = state
        .auth
        .obtain_pair(
            credentials.phone_number.as_deref().unwrap_or_default(),
            credentials.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(pair))
}

#[post("/auth/token/refresh/")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    body: Body<RefreshRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let pair = state
        .auth
        .refresh(request.refresh.as_deref().unwrap_or_default())
        .await?;

    Ok(HttpResponse::Ok().json(pair))
}

#[post("/auth/token/verification/")]
pub async fn verify_token(
    state: web::Data<AppState>,
    body: Body<VerifyRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    state
        .auth
        .verify(request.token.as_deref().unwrap_or_default())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

/// Inscription : renvoie l'utilisateur et sa paire de tokens
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<AppState>,
    body: Body<SignupRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let user = state.users.signup(request.into()).await?;
    let token = state.auth.issue_pair(&user)?;

    Ok(HttpResponse::Created().json(SignupResponse {
        user: user.into(),
        token,
    }))
}
