use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rest_boilerplate::ops::{self, install, style as s, OpsContext, Runner};

/// Project operations: containers, database backups, app management and lint.
#[derive(Debug, Parser)]
#[command(name = "ops")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(about = "Developer and deployment tasks for the REST boilerplate")]
#[command(
    after_help = "\x1b[1;32mExamples:\x1b[0m\n  \x1b[36mops setup\x1b[0m                 \x1b[2m# Copy environment templates\x1b[0m\n  \x1b[36mops keygen\x1b[0m                \x1b[2m# Fill secrets in app.env\x1b[0m\n  \x1b[36mops docker up\x1b[0m             \x1b[2m# Start the stack in background\x1b[0m\n  \x1b[36mops db backup\x1b[0m             \x1b[2m# Dump the database into backups/\x1b[0m\n  \x1b[36mops dj startapp orders\x1b[0m    \x1b[2m# Scaffold a new app module\x1b[0m"
)]
struct Cli {
    /// Print commands without running them.
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,
    /// Answer yes to every confirmation.
    #[arg(short = 'y', long, global = true, default_value_t = false)]
    yes: bool,
    /// Project root containing `.env` and `environments/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy environment templates and fill docker-compose.yml
    Setup,
    /// Generate secrets in the environment file
    Keygen,
    /// docker compose: ps, build, up, down, start, stop, restart, logs, bash, rebuild
    Docker(ProxyArgs),
    /// Database: backup, restore
    Db(ProxyArgs),
    /// Application: shell, migrate, createsuperuser, test, startapp, makecommand
    #[command(alias = "dj")]
    App(ProxyArgs),
    /// Lint: fmt, clippy, all
    Lint(ProxyArgs),
}

#[derive(Debug, Args)]
struct ProxyArgs {
    /// Task name
    cmd: String,
    /// Extra arguments forwarded to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let ctx = OpsContext::load(&cli.root)?;
    let yes = cli.yes;
    let confirm = |prompt: &str| -> Result<bool> { Ok(yes || ops::confirm(prompt)?) };

    let (group_name, proxy) = match &cli.command {
        Command::Setup => {
            install::setup(&ctx, confirm)?;
            return Ok(());
        }
        Command::Keygen => {
            install::keygen(&ctx, confirm)?;
            return Ok(());
        }
        Command::Docker(proxy) => ("docker", proxy),
        Command::Db(proxy) => ("db", proxy),
        Command::App(proxy) => ("app", proxy),
        Command::Lint(proxy) => ("lint", proxy),
    };

    let group = ops::group(group_name).ok_or_else(|| anyhow!("unknown task group '{}'", group_name))?;
    let commands = group.commands(&ctx, &proxy.cmd, &proxy.args.join(" "))?;

    Runner::new(&cli.root, cli.dry_run).run(&commands)
}
