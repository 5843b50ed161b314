//! Outils partagés par les tests de l'API

use std::ops::Deref;
use std::sync::Arc;

use actix_web::{web, App};
use rand::Rng;

use crate::api::{config, AppState};
use crate::domain::{NewUser, User, UserStore};
use crate::infrastructure::Stores;
use crate::utils::config::Config;

pub const DEFAULT_PASSWORD: &str = "password";
pub const NEW_PASSWORD: &str = "new-password";

/// Appelant d'une requête de test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Guest,
    User,
}

/// État d'application adossé au stockage en mémoire
pub struct TestState {
    pub data: web::Data<AppState>,
    pub stores: Stores,
}

impl TestState {
    pub fn users_store(&self) -> &Arc<dyn UserStore> {
        &self.stores.users
    }
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.data
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SECRET_KEY" => Some("test-secret-key".to_string()),
        "DATABASE_URL" => Some("memory://".to_string()),
        _ => None,
    })
    .expect("test configuration")
}

pub fn test_state() -> TestState {
    let stores = Stores::memory();
    let data = web::Data::new(AppState::new(test_config(), &stores));
    TestState { data, stores }
}

pub fn test_app(
    state: &TestState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state.data.clone()).configure(config)
}

/// Numéro aléatoire préfixé, par exemple `1000` suivi de sept chiffres
pub fn make_phone_number(start_with: u32) -> String {
    let n: u32 = rand::thread_rng().gen_range(1_000_001..=9_999_999);
    format!("{}{}", start_with, n)
}

pub async fn create_user(state: &TestState) -> User {
    state
        .users
        .signup(NewUser {
            phone_number: Some(make_phone_number(1000)),
            password: Some(DEFAULT_PASSWORD.to_string()),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            ..NewUser::default()
        })
        .await
        .expect("user created")
}

/// En-tête `Authorization` pour l'utilisateur
pub fn bearer(state: &TestState, user: &User) -> String {
    let pair = state.auth.issue_pair(user).expect("token pair");
    format!("Bearer {}", pair.access)
}
