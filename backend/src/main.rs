use actix_web::{middleware, web, App, HttpServer};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rest_boilerplate::api::{self, AppState};
use rest_boilerplate::core::UserService;
use rest_boilerplate::infrastructure::Stores;
use rest_boilerplate::utils::config::Config;
use rest_boilerplate::utils::helpers::TimeIt;

#[derive(Parser)]
#[command(name = "server", version, about = "REST boilerplate backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Démarre le serveur HTTP (par défaut)
    Serve,
    /// Applique les migrations en attente
    Migrate,
    /// Purge les refresh tokens expirés de la liste noire
    Flushexpiredtokens,
    /// Crée un super-utilisateur
    Createsuperuser {
        #[arg(long)]
        phone_number: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Chargement de la configuration
    let config = Config::from_env().context("Impossible de charger la configuration")?;
    setup_tracing(&config);
    info!(env = %config.env, "Configuration chargée");

    let stores = Stores::connect(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, stores).await,
        Command::Migrate => {
            let Some(database) = stores.database.as_ref() else {
                warn!("Stockage en mémoire : aucune migration à appliquer");
                return Ok(());
            };
            let _timer = TimeIt::new("migrate");
            database.migrate().await?;
            info!("Migrations appliquées");
            Ok(())
        }
        Command::Flushexpiredtokens => {
            let state = AppState::new(config, &stores);
            let removed = state.auth.flush_expired_tokens().await?;
            info!(removed, "Expired tokens flushed");
            Ok(())
        }
        Command::Createsuperuser {
            phone_number,
            password,
            first_name,
            last_name,
        } => {
            if stores.database.is_none() {
                bail!("createsuperuser requires a PostgreSQL DATABASE_URL");
            }
            let user = UserService::new(stores.users.clone())
                .create_superuser(&phone_number, &password, &first_name, &last_name)
                .await?;
            info!(user_id = %user.id, "Superuser created successfully.");
            Ok(())
        }
    }
}

async fn serve(config: Config, stores: Stores) -> anyhow::Result<()> {
    let bind = (config.server_host.clone(), config.server_port);
    let workers = config.workers;
    let state = web::Data::new(AppState::new(config, &stores));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors(&state.config))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(api::config)
    })
    .bind(&bind)?
    .workers(workers)
    .shutdown_timeout(10);

    info!("API disponible sur http://{}:{}/api/v1/", bind.0, bind.1);

    server.run().await?;
    Ok(())
}

/// Configure le tracing pour le logging structuré
fn setup_tracing(config: &Config) {
    let log_level = config.log_level.parse().unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(if config.log_format == "json" {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
