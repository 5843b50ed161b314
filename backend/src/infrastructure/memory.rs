//! Adaptateurs en mémoire, utilisés avec `DATABASE_URL=memory://` et dans les tests

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::{TokenBlacklist, User, UserStore},
    utils::error::{AppError, Result},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn phone_conflict(users: &HashMap<Uuid, User>, user: &User) -> bool {
    match &user.phone_number {
        Some(phone) => users
            .values()
            .any(|other| other.id != user.id && other.phone_number.as_ref() == Some(phone)),
        None => false,
    }
}

fn duplicate_phone() -> AppError {
    AppError::field("phone_number", "user with this phone number already exists.")
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(AppError::Database(format!("duplicate user id {}", user.id)));
        }
        if phone_conflict(&users, user) {
            return Err(duplicate_phone());
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned())
    }

    async fn phone_taken(&self, phone_number: &str, exclude: Option<Uuid>) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| {
            u.phone_number.as_deref() == Some(phone_number) && Some(u.id) != exclude
        }))
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if phone_conflict(&users, user) {
            return Err(duplicate_phone());
        }
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(AppError::not_found()),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenBlacklist {
    entries: RwLock<HashMap<String, (Uuid, DateTime<Utc>)>>,
}

impl MemoryTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TokenBlacklist for MemoryTokenBlacklist {
    async fn blacklist(&self, jti: &str, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<()> {
        self.entries
            .write()
            .await
            .entry(jti.to_string())
            .or_insert((user_id, expires_at));
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(jti))
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (_, expires_at)| *expires_at >= now);
        Ok((before - entries.len()) as u64)
    }
}
