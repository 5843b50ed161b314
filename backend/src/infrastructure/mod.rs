pub mod database;
pub mod memory;

pub use database::Database;
pub use memory::{MemoryTokenBlacklist, MemoryUserStore};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::domain::{TokenBlacklist, UserStore};
use crate::utils::{config::Config, error::Result, helpers::try_it};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Adaptateurs de stockage partagés par les services
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub database: Option<Database>,
}

impl Stores {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            blacklist: Arc::new(MemoryTokenBlacklist::new()),
            database: None,
        }
    }

    pub fn postgres(database: Database) -> Self {
        Self {
            users: Arc::new(database::UserRepository::new(database.pool.clone())),
            blacklist: Arc::new(database::PgTokenBlacklist::new(database.pool.clone())),
            database: Some(database),
        }
    }

    /// Choisit l'adaptateur selon `DATABASE_URL`
    ///
    /// La connexion PostgreSQL est retentée le temps que la base démarre.
    pub async fn connect(config: &Config) -> Result<Self> {
        if config.uses_memory_store() {
            info!("Stockage en mémoire (DATABASE_URL=memory://)");
            return Ok(Self::memory());
        }

        let database = try_it(CONNECT_ATTEMPTS, CONNECT_DELAY, || {
            Database::connect(&config.database_url, config.database_max_connections)
        })
        .await?;

        Ok(Self::postgres(database))
    }
}
