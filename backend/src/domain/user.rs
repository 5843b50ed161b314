use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::Result;
use crate::utils::security::{hash_password, verify_password};

/// Représente un utilisateur du système
///
/// Le numéro de téléphone sert d'identifiant de connexion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifiant unique de l'utilisateur (UUID)
    pub id: Uuid,
    /// Numéro de téléphone (unique)
    pub phone_number: Option<String>,
    /// Hash du mot de passe, vide si aucun mot de passe n'est défini
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Accès à l'administration
    pub is_staff: bool,
    /// Les comptes sont désactivés plutôt que supprimés
    pub is_active: bool,
    pub is_superuser: bool,
    /// Date de création
    pub created: DateTime<Utc>,
    /// Date de dernière modification
    pub modified: DateTime<Utc>,
}

/// Données requises pour créer un nouvel utilisateur
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            phone_number: None,
            password: None,
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_active: true,
            is_superuser: false,
        }
    }
}

/// Modifications applicables à un utilisateur existant
///
/// `None` laisse le champ inchangé. Un email vide efface l'email.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
    }

    /// Appliquer les modifications ; le mot de passe est hashé
    pub fn apply(self, user: &mut User) -> Result<()> {
        if let Some(phone_number) = self.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(email) = self.email {
            user.email = if email.is_empty() { None } else { Some(email) };
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(password) = self.password.filter(|p| !p.is_empty()) {
            user.set_password(&password)?;
        }
        user.modify();
        Ok(())
    }
}

impl User {
    /// Crée un nouvel utilisateur avec un mot de passe hashé
    pub fn new(data: NewUser) -> Result<Self> {
        let now = Utc::now();
        let mut user = Self {
            id: Uuid::new_v4(),
            phone_number: data.phone_number,
            password: String::new(),
            email: data.email.filter(|e| !e.is_empty()),
            first_name: data.first_name,
            last_name: data.last_name,
            is_staff: data.is_staff,
            is_active: data.is_active,
            is_superuser: data.is_superuser,
            created: now,
            modified: now,
        };

        if let Some(password) = data.password.filter(|p| !p.is_empty()) {
            user.set_password(&password)?;
        }

        Ok(user)
    }

    pub fn set_password(&mut self, raw: &str) -> Result<()> {
        self.password = hash_password(raw)?;
        Ok(())
    }

    /// Un mot de passe vide ne correspond jamais
    pub fn check_password(&self, raw: &str) -> bool {
        verify_password(raw, &self.password)
    }

    pub fn has_usable_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Met à jour la date de modification
    pub fn modify(&mut self) {
        self.modified = Utc::now();
    }

    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.noname()
        } else {
            name.to_string()
        }
    }

    pub fn short_name(&self) -> String {
        let initial = self.first_name.chars().next().unwrap_or(' ');
        let name = format!("{} {}", initial, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.noname()
        } else {
            name.to_string()
        }
    }

    fn noname(&self) -> String {
        format!("Noname ({})", self.id)
    }

    /// Claims publics ajoutés aux tokens
    pub fn public_jwt_data(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Claims privés, chiffrés dans les tokens
    pub fn private_jwt_data(&self) -> Map<String, Value> {
        Map::new()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
