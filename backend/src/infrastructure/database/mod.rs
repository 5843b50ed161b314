pub mod tokens;
pub mod users;

pub use tokens::PgTokenBlacklist;
pub use users::UserRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::utils::error::Result;

/// Gestion de la connexion à la base de données
#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    /// Crée une nouvelle connexion à la base de données
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Connexion à la base de données PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Connexion établie");

        Ok(Self { pool })
    }

    /// Applique les migrations de `backend/migrations`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
