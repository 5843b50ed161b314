// core/user_service.rs
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{NewUser, User, UserChanges, UserStore};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::validate_phone_number;

const PHONE_TAKEN: &str = "user with this phone number already exists.";

/// Une page de résultats avec le nombre total d'éléments visibles
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub count: usize,
    pub results: Vec<T>,
}

/// Gestion des utilisateurs, toujours vue depuis l'appelant
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Inscription d'un nouvel utilisateur
    pub async fn signup(&self, data: NewUser) -> Result<User> {
        if let Some(phone) = data.phone_number.as_deref() {
            if self.store.phone_taken(phone, None).await? {
                return Err(AppError::field("phone_number", PHONE_TAKEN));
            }
        }

        let user = User::new(data)?;
        self.store.insert(&user).await?;

        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Création d'un super-utilisateur (commande de gestion)
    pub async fn create_superuser(
        &self,
        phone_number: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User> {
        validate_phone_number(phone_number).map_err(|e| {
            AppError::field(
                "phone_number",
                e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()),
            )
        })?;
        if password.is_empty() {
            return Err(AppError::field("password", crate::utils::error::BLANK));
        }

        let user = self
            .signup(NewUser {
                phone_number: Some(phone_number.to_string()),
                password: Some(password.to_string()),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                is_staff: true,
                is_superuser: true,
                ..NewUser::default()
            })
            .await?;

        info!(user_id = %user.id, "superuser created");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.store.get_by_id(id).await?.ok_or_else(AppError::not_found)
    }

    /// Liste des utilisateurs visibles : uniquement l'appelant
    pub async fn list_for(&self, caller: &User, limit: usize, offset: usize) -> Result<Listing<User>> {
        let visible: Vec<User> = self.store.get_by_id(caller.id).await?.into_iter().collect();

        Ok(Listing {
            count: visible.len(),
            results: visible.into_iter().skip(offset).take(limit).collect(),
        })
    }

    /// Détail d'un utilisateur ; tout autre identifiant que celui de l'appelant est introuvable
    pub async fn get_for(&self, caller: &User, id: Uuid) -> Result<User> {
        if caller.id != id {
            return Err(AppError::not_found());
        }
        self.get(id).await
    }

    /// Mise à jour d'un utilisateur visible par l'appelant
    pub async fn update_for(&self, caller: &User, id: Uuid, changes: UserChanges) -> Result<User> {
        let mut user = self.get_for(caller, id).await?;

        if let Some(phone) = changes.phone_number.as_deref() {
            if self.store.phone_taken(phone, Some(user.id)).await? {
                return Err(AppError::field("phone_number", PHONE_TAKEN));
            }
        }

        changes.apply(&mut user)?;
        self.store.update(&user).await?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }
}
