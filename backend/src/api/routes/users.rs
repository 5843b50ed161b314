use actix_web::{get, patch, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{
        pagination::{Page, PageParams},
        routes::{middleware::CurrentUser, Body},
        AppState,
    },
    domain::{User, UserChanges},
    utils::error::{AppError, FieldErrors, Result, REQUIRED},
    utils::validation::{validate_not_blank, validate_optional_email, validate_phone_number},
};

/// Représentation publique d'un utilisateur (sans mot de passe)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone_number: user.phone_number,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Mise à jour d'un utilisateur ; un mot de passe vide est ignoré
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,
    #[validate(
        custom = "validate_optional_email",
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,
    #[validate(
        custom = "validate_not_blank",
        length(max = 64, message = "Ensure this field has no more than 64 characters.")
    )]
    pub first_name: Option<String>,
    #[validate(
        custom = "validate_not_blank",
        length(max = 64, message = "Ensure this field has no more than 64 characters.")
    )]
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Une mise à jour complète (PUT) exige les champs obligatoires du modèle
    fn require_full(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.first_name.is_none() {
            errors.insert("first_name".to_string(), vec![REQUIRED.to_string()]);
        }
        if self.last_name.is_none() {
            errors.insert("last_name".to_string(), vec![REQUIRED.to_string()]);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        UserChanges {
            phone_number: req.phone_number,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

/// Identifiant de chemin ; un identifiant mal formé est introuvable
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found())
}

#[get("/users/")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    params: web::Query<PageParams>,
) -> Result<HttpResponse> {
    let limit = params.limit(state.config.page_size as usize);
    let offset = params.offset();

    let listing = state.users.list_for(&user, limit, offset).await?;
    let results = listing.results.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(Page::new(&req, listing.count, limit, offset, results)))
}

#[get("/users/me/")]
pub async fn me(CurrentUser(user): CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[patch("/users/me/")]
pub async fn update_me(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: Body<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    let updated = state.users.update_for(&user, user.id, request.into()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[get("/users/{id}/")]
pub async fn retrieve_user(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;
    let found = state.users.get_for(&user, id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

#[patch("/users/{id}/")]
pub async fn update_user(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<String>,
    body: Body<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;
    let request = body.into_inner();
    request.validate()?;

    let updated = state.users.update_for(&user, id, request.into()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[put("/users/{id}/")]
pub async fn replace_user(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    path: web::Path<String>,
    body: Body<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let id = parse_id(&path)?;
    let request = body.into_inner();
    request.validate()?;
    request.require_full()?;

    let updated = state.users.update_for(&user, id, request.into()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_utils::{
        bearer, create_user, make_phone_number, test_app, test_state, Caller, DEFAULT_PASSWORD,
        NEW_PASSWORD,
    };
    use actix_web::{http::StatusCode, test};
    use rstest::rstest;
    use serde_json::{json, Value};

    const LIST_URL: &str = "/api/v1/users/";
    const ME_URL: &str = "/api/v1/users/me/";

    fn detail_url(id: impl std::fmt::Display) -> String {
        format!("/api/v1/users/{}/", id)
    }

    #[rstest]
    #[case::guest(Caller::Guest, StatusCode::FORBIDDEN)]
    #[case::user(Caller::User, StatusCode::OK)]
    #[actix_web::test]
    async fn me(#[case] caller: Caller, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let mut req = test::TestRequest::get().uri(ME_URL);
        if caller == Caller::User {
            req = req.insert_header(("Authorization", bearer(&state, &user)));
        }
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), expected);
        if expected.is_success() {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["id"], user.id.to_string());
            assert_eq!(body["phone_number"], json!(user.phone_number));
            assert!(body.get("password").is_none());
        }
    }

    #[rstest]
    #[case::guest(Caller::Guest, StatusCode::FORBIDDEN)]
    #[case::user(Caller::User, StatusCode::OK)]
    #[actix_web::test]
    async fn me_update(#[case] caller: Caller, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;
        let new_number = make_phone_number(1000);

        let mut req = test::TestRequest::patch()
            .uri(ME_URL)
            .set_json(json!({"phone_number": new_number}));
        if caller == Caller::User {
            req = req.insert_header(("Authorization", bearer(&state, &user)));
        }
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), expected);
        if expected.is_success() {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["id"], user.id.to_string());
            assert_eq!(body["phone_number"], new_number);

            let stored = state.users.get(user.id).await.unwrap();
            assert_eq!(stored.phone_number.as_deref(), Some(new_number.as_str()));
        }
    }

    #[actix_web::test]
    async fn me_set_new_password() {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::patch()
            .uri(ME_URL)
            .insert_header(("Authorization", bearer(&state, &user)))
            .set_form([("password", NEW_PASSWORD)])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let stored = state.users.get(user.id).await.unwrap();
        assert!(stored.check_password(NEW_PASSWORD));
    }

    #[actix_web::test]
    async fn me_update_rejects_invalid_phone_number() {
        let state = test_state();
        let user = create_user(&state).await;
        let other = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        for phone_number in ["111", other.phone_number.as_deref().unwrap_or_default()] {
            let req = test::TestRequest::patch()
                .uri(ME_URL)
                .insert_header(("Authorization", bearer(&state, &user)))
                .set_json(json!({"phone_number": phone_number}))
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["details"]["phone_number"].is_array());
        }
    }

    #[rstest]
    #[case::guest(Caller::Guest, StatusCode::FORBIDDEN)]
    #[case::user(Caller::User, StatusCode::OK)]
    #[actix_web::test]
    async fn list(#[case] caller: Caller, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        for _ in 0..3 {
            create_user(&state).await;
        }
        let app = test::init_service(test_app(&state)).await;

        let mut req = test::TestRequest::get().uri(LIST_URL);
        if caller == Caller::User {
            req = req.insert_header(("Authorization", bearer(&state, &user)));
        }
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), expected);
        if expected.is_success() {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["count"], 1);
            assert!(body["next"].is_null());
            assert!(body["previous"].is_null());

            let first = &body["results"][0];
            assert_eq!(first["id"], user.id.to_string());
            assert_eq!(first["phone_number"], json!(user.phone_number));
            assert_eq!(first["email"], json!(user.email));
            assert_eq!(first["first_name"], user.first_name);
            assert_eq!(first["last_name"], user.last_name);
            assert!(first.get("password").is_none());
        }
    }

    #[actix_web::test]
    async fn list_past_the_end_links_back() {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users/?limit=1&offset=1")
            .insert_header(("Authorization", bearer(&state, &user)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], 1);
        assert_eq!(body["results"], json!([]));
        assert!(body["previous"].as_str().unwrap().ends_with("/api/v1/users/?limit=1"));
    }

    #[rstest]
    #[case::huge_offset("/api/v1/users/?offset=18446744073709551615")]
    #[case::huge_limit("/api/v1/users/?limit=18446744073709551615&offset=1")]
    #[actix_web::test]
    async fn list_with_huge_pagination_values(#[case] uri: &str) {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bearer(&state, &user)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"], json!([]));
        assert!(body["next"].is_null());
    }

    #[rstest]
    #[case::guest_on_user(Caller::Guest, false, StatusCode::FORBIDDEN)]
    #[case::user_on_self(Caller::User, false, StatusCode::OK)]
    #[case::user_on_another_user(Caller::User, true, StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn update(#[case] caller: Caller, #[case] another: bool, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        let another_user = create_user(&state).await;
        let editing = if another { &another_user } else { &user };
        let app = test::init_service(test_app(&state)).await;
        let new_number = make_phone_number(1000);

        let mut req = test::TestRequest::patch()
            .uri(&detail_url(editing.id))
            .set_json(json!({"phone_number": new_number}));
        if caller == Caller::User {
            req = req.insert_header(("Authorization", bearer(&state, &user)));
        }
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), expected);
        let stored = state.users.get(editing.id).await.unwrap();
        if expected.is_success() {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["id"], editing.id.to_string());
            assert_eq!(body["phone_number"], new_number);
            assert_eq!(stored.phone_number.as_deref(), Some(new_number.as_str()));
        } else {
            assert_eq!(stored.phone_number, editing.phone_number);
        }
    }

    #[actix_web::test]
    async fn new_password_for_another_user() {
        let state = test_state();
        let user = create_user(&state).await;
        let another_user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::patch()
            .uri(&detail_url(another_user.id))
            .insert_header(("Authorization", bearer(&state, &user)))
            .set_json(json!({"password": NEW_PASSWORD}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(state.users.get(user.id).await.unwrap().check_password(DEFAULT_PASSWORD));
        assert!(state
            .users
            .get(another_user.id)
            .await
            .unwrap()
            .check_password(DEFAULT_PASSWORD));
    }

    #[rstest]
    #[case::self_id(false, StatusCode::OK)]
    #[case::another_id(true, StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn retrieve(#[case] another: bool, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        let another_user = create_user(&state).await;
        let target = if another { another_user.id } else { user.id };
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri(&detail_url(target))
            .insert_header(("Authorization", bearer(&state, &user)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), expected);
    }

    #[actix_web::test]
    async fn malformed_id_is_not_found() {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri(&detail_url("not-a-uuid"))
            .insert_header(("Authorization", bearer(&state, &user)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn replace_requires_names() {
        let state = test_state();
        let user = create_user(&state).await;
        let app = test::init_service(test_app(&state)).await;

        let partial = test::TestRequest::put()
            .uri(&detail_url(user.id))
            .insert_header(("Authorization", bearer(&state, &user)))
            .set_json(json!({"email": "ada@example.com"}))
            .to_request();
        let resp = test::call_service(&app, partial).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let full = test::TestRequest::put()
            .uri(&detail_url(user.id))
            .insert_header(("Authorization", bearer(&state, &user)))
            .set_json(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, full).await;
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["email"], "ada@example.com");
    }

    #[rstest]
    #[case::guest_on_user(Caller::Guest, false, StatusCode::FORBIDDEN)]
    #[case::user_on_self(Caller::User, false, StatusCode::OK)]
    #[case::user_on_another_user(Caller::User, true, StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn replace(#[case] caller: Caller, #[case] another: bool, #[case] expected: StatusCode) {
        let state = test_state();
        let user = create_user(&state).await;
        let another_user = create_user(&state).await;
        let editing = if another { &another_user } else { &user };
        let app = test::init_service(test_app(&state)).await;

        let mut req = test::TestRequest::put().uri(&detail_url(editing.id)).set_json(json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "password": NEW_PASSWORD,
        }));
        if caller == Caller::User {
            req = req.insert_header(("Authorization", bearer(&state, &user)));
        }
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), expected);
        let stored = state.users.get(editing.id).await.unwrap();
        if expected.is_success() {
            assert_eq!(stored.first_name, "Grace");
            assert_eq!(stored.last_name, "Hopper");
            assert!(stored.check_password(NEW_PASSWORD));
        } else {
            assert_eq!(stored.first_name, editing.first_name);
            assert_eq!(stored.last_name, editing.last_name);
            assert_eq!(stored.modified, editing.modified);
            assert!(stored.check_password(DEFAULT_PASSWORD));
        }
    }

    #[actix_web::test]
    async fn invalid_token_is_unauthorized() {
        let state = test_state();
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri(ME_URL)
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("WWW-Authenticate"));
    }

    #[actix_web::test]
    async fn refresh_token_cannot_authenticate() {
        let state = test_state();
        let user = create_user(&state).await;
        let pair = state.auth.issue_pair(&user).unwrap();
        let app = test::init_service(test_app(&state)).await;

        let req = test::TestRequest::get()
            .uri(ME_URL)
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
