//! Commande de gestion.
//!
//! Appeler `run` depuis une sous-commande du binaire `server`.

use tracing::info;

use crate::api::AppState;
use crate::utils::helpers::TimeIt;

/// Exécute la commande avec l'état de l'application
pub async fn run(state: &AppState, args: &[String]) -> anyhow::Result<()> {
    let _timer = TimeIt::new("command");
    info!(?args, env = %state.config.env, "running command");

    // Logique de la commande

    Ok(())
}
