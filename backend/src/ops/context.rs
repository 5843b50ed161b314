// ops/context.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

/// Variables du projet utilisées par les modèles de commandes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsContext {
    pub root: PathBuf,
    pub env: String,
    pub project_name: String,
    pub app_name: String,
    pub app_port: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
}

impl OpsContext {
    /// Charge `.env` (obligatoire) puis `environments/<ENV>/app.env`
    ///
    /// Le fichier d'environnement peut manquer tant que `setup` n'a pas été lancé.
    pub fn load(root: &Path) -> Result<Self> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();

        let dotenv_path = root.join(".env");
        if !dotenv_path.exists() {
            bail!("Env file not found: {}", dotenv_path.display());
        }
        vars.extend(read_env_file(&dotenv_path)?);

        let env = vars.get("ENV").cloned().unwrap_or_else(|| "development".to_string());
        let env_file = root.join(env_file_path(&env));
        if env_file.exists() {
            vars.extend(read_env_file(&env_file)?);
        } else {
            warn!(path = %env_file.display(), "environment file not found, run `ops setup`");
        }

        Ok(Self::from_vars(root, &vars))
    }

    pub fn from_vars(root: &Path, vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| vars.get(key).cloned().unwrap_or_default();
        Self {
            root: root.to_path_buf(),
            env: vars.get("ENV").cloned().unwrap_or_else(|| "development".to_string()),
            project_name: get("PROJECT_NAME"),
            app_name: get("APP_NAME"),
            app_port: get("APP_PORT"),
            db_user: get("POSTGRES_USER"),
            db_password: get("POSTGRES_PASSWORD"),
            db_name: get("POSTGRES_DB"),
        }
    }

    /// `environments/<ENV>`, relatif à la racine du projet
    pub fn env_dir(&self) -> PathBuf {
        Path::new("environments").join(&self.env)
    }

    pub fn compose(&self) -> PathBuf {
        self.env_dir().join("docker-compose.yml")
    }

    pub fn env_file(&self) -> PathBuf {
        env_file_path(&self.env)
    }

    /// Remplace les variables `{NAME}` d'un modèle de commande
    pub fn render(&self, tpl: &str, cmd: &str, args: &str) -> String {
        let compose = self.compose().to_string_lossy().into_owned();
        let env_file = self.env_file().to_string_lossy().into_owned();
        let replacements = [
            ("{ENV}", self.env.as_str()),
            ("{PROJECT_NAME}", self.project_name.as_str()),
            ("{APP_NAME}", self.app_name.as_str()),
            ("{APP_PORT}", self.app_port.as_str()),
            ("{COMPOSE}", compose.as_str()),
            ("{ENV_FILE}", env_file.as_str()),
            ("{DB_USER}", self.db_user.as_str()),
            ("{DB_NAME}", self.db_name.as_str()),
            ("{cmd}", cmd),
            ("{args}", args),
        ];

        let rendered = replacements
            .iter()
            .fold(tpl.to_string(), |acc, (key, value)| acc.replace(key, value));

        rendered.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn env_file_path(env: &str) -> PathBuf {
    Path::new("environments").join(env).join("app.env")
}

fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    debug!(path = %path.display(), "loading env file");
    dotenv::from_path_iter(path)
        .with_context(|| format!("unable to read {}", path.display()))?
        .map(|item| item.with_context(|| format!("malformed line in {}", path.display())))
        .collect()
}
