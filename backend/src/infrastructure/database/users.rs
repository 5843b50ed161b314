use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    domain::{User, UserStore},
    utils::error::{AppError, Result},
};

const USER_COLUMNS: &str = "id, phone_number, password, email, first_name, last_name, \
     is_staff, is_active, is_superuser, created, modified";

const UNIQUE_VIOLATION: &str = "23505";

/// Repository pour les opérations sur les utilisateurs
#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Une violation d'unicité ne peut venir que du numéro de téléphone
fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::field("phone_number", "user with this phone number already exists.");
        }
    }
    err.into()
}

#[async_trait::async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, phone_number, password, email, first_name, last_name,
                is_staff, is_active, is_superuser, created, modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id)
        .bind(&user.phone_number)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.created)
        .bind(user.modified)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE phone_number = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn phone_taken(&self, phone_number: &str, exclude: Option<Uuid>) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE phone_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(phone_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET phone_number = $2, password = $3, email = $4, first_name = $5,
                last_name = $6, is_staff = $7, is_active = $8, is_superuser = $9,
                modified = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.phone_number)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.modified)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }
}
