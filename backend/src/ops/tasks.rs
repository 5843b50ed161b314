// ops/tasks.rs
//! Groupes de tâches : chaque commande produit une ou plusieurs lignes shell
//! à partir de modèles paramétrés par le contexte du projet.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use tracing::info;

use super::context::OpsContext;

const COMPOSE_TPL: &str = "docker compose -f {COMPOSE} {cmd} {args}";
const SERVER_TPL: &str = "docker compose -f {COMPOSE} exec {APP_NAME} server {cmd} {args}";
const TOOLS_TPL: &str = "docker compose -f {COMPOSE} exec {APP_NAME} {cmd} {args}";

pub const BACKUP_DIR: &str = "backups";
pub const APPS_DIR: &str = "backend/src/apps";
pub const STARTAPP_TEMPLATE: &str = "boilerplate/startapp";
pub const MAKECOMMAND_TEMPLATE: &str = "boilerplate/makecommand/example.rs";

pub trait TaskGroup {
    fn name(&self) -> &'static str;

    /// Commandes shell pour `(cmd, args)` ; une commande inconnue est une erreur
    fn commands(&self, ctx: &OpsContext, cmd: &str, args: &str) -> Result<Vec<String>>;
}

fn not_found(cmd: &str) -> anyhow::Error {
    anyhow::anyhow!("command not found: '{}'", cmd)
}

fn or_default<'a>(args: &'a str, default: &'a str) -> &'a str {
    if args.trim().is_empty() {
        default
    } else {
        args
    }
}

/// Orchestration docker compose
pub struct DockerTasks;

impl TaskGroup for DockerTasks {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn commands(&self, ctx: &OpsContext, cmd: &str, args: &str) -> Result<Vec<String>> {
        let commands = match cmd {
            "ps" | "build" | "down" | "start" | "stop" | "restart" => {
                vec![ctx.render(COMPOSE_TPL, cmd, args)]
            }
            "up" => vec![ctx.render(COMPOSE_TPL, "up -d", args)],
            "logs" => vec![ctx.render(
                "docker compose -f {COMPOSE} logs {APP_NAME} {args}",
                cmd,
                or_default(args, "--tail 100 -f"),
            )],
            "bash" => vec![ctx.render(
                "docker compose -f {COMPOSE} exec {APP_NAME} bash {args}",
                cmd,
                args,
            )],
            "rebuild" => vec![
                ctx.render(COMPOSE_TPL, "down", args),
                ctx.render(COMPOSE_TPL, "build", args),
                ctx.render(COMPOSE_TPL, "up -d", args),
            ],
            _ => return Err(not_found(cmd)),
        };
        Ok(commands)
    }
}

/// Sauvegarde et restauration PostgreSQL
pub struct DbTasks;

impl DbTasks {
    pub fn backup_name(now: DateTime<Local>) -> String {
        format!("{}.db", now.format("%Y%m%d%H%M%S"))
    }

    /// Nom de la sauvegarde la plus récente (14 chiffres + `.db`)
    pub fn latest_backup(dir: &Path) -> Result<Option<String>> {
        if !dir.exists() {
            return Ok(None);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if is_backup_name(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names.pop())
    }
}

fn is_backup_name(name: &str) -> bool {
    match name.strip_suffix(".db") {
        Some(stamp) => stamp.len() == 14 && stamp.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

impl TaskGroup for DbTasks {
    fn name(&self) -> &'static str {
        "db"
    }

    fn commands(&self, ctx: &OpsContext, cmd: &str, args: &str) -> Result<Vec<String>> {
        match cmd {
            "backup" => {
                let file = format!("{}/{}", BACKUP_DIR, Self::backup_name(Local::now()));
                Ok(vec![
                    format!("mkdir -p {}", BACKUP_DIR),
                    ctx.render(
                        &format!(
                            "docker compose -f {{COMPOSE}} {{args}} exec db pg_dump -U {{DB_USER}} {{DB_NAME}} > {}",
                            file
                        ),
                        "",
                        args,
                    ),
                ])
            }
            "restore" => {
                let Some(name) = Self::latest_backup(&ctx.root.join(BACKUP_DIR))? else {
                    bail!("no backup found in {}/", BACKUP_DIR);
                };
                Ok(vec![ctx.render(
                    &format!(
                        "docker compose -f {{COMPOSE}} {{args}} exec -T db psql -U {{DB_USER}} {{DB_NAME}} < {}/{}",
                        BACKUP_DIR, name
                    ),
                    "",
                    args,
                )])
            }
            _ => Err(not_found(cmd)),
        }
    }
}

/// Commandes de gestion de l'application (alias `dj`)
pub struct AppTasks;

impl AppTasks {
    fn startapp(&self, args: &str) -> Result<Vec<String>> {
        let Some(app) = args.split_whitespace().next() else {
            bail!("`app_name` was not provided");
        };
        ensure_identifier("app_name", app)?;

        let target = format!("{}/{}", APPS_DIR, app);
        info!(
            "register the app with `pub mod {app};` and `{app}::config(cfg)` in {}/mod.rs",
            APPS_DIR
        );
        Ok(vec![
            format!("mkdir -p {}", target),
            format!("cp -r {}/. {}/", STARTAPP_TEMPLATE, target),
        ])
    }

    fn makecommand(&self, args: &str) -> Result<Vec<String>> {
        let mut parts = args.split_whitespace();
        let Some(app) = parts.next() else {
            bail!("`app_name` was not provided");
        };
        let Some(command) = parts.next() else {
            bail!("`command_name` was not provided");
        };
        ensure_identifier("app_name", app)?;
        ensure_identifier("command_name", command)?;

        let dir = format!("{}/{}/commands", APPS_DIR, app);
        info!(
            "register the command with `pub mod {command};` in {dir}/mod.rs \
             and `pub mod commands;` in {}/{app}/mod.rs",
            APPS_DIR
        );
        Ok(vec![
            format!("mkdir -p {}", dir),
            format!("touch {}/mod.rs", dir),
            format!("cp {} {}/{}.rs", MAKECOMMAND_TEMPLATE, dir, command),
        ])
    }
}

/// Les noms servent de modules Rust : minuscules, chiffres et `_`
fn ensure_identifier(what: &str, name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        bail!("`{}` must be a valid module name, got '{}'", what, name);
    }
    Ok(())
}

impl TaskGroup for AppTasks {
    fn name(&self) -> &'static str {
        "app"
    }

    fn commands(&self, ctx: &OpsContext, cmd: &str, args: &str) -> Result<Vec<String>> {
        match cmd {
            "shell" => Ok(vec![ctx.render(TOOLS_TPL, "bash", args)]),
            "migrate" | "createsuperuser" | "flushexpiredtokens" => {
                Ok(vec![ctx.render(SERVER_TPL, cmd, args)])
            }
            // L'image de l'application ne contient que le binaire : tests sur l'hôte
            "test" => Ok(vec![ctx.render("cargo test {args}", cmd, args)]),
            "startapp" => self.startapp(args),
            "makecommand" => self.makecommand(args),
            _ => Err(not_found(cmd)),
        }
    }
}

/// Formatage et analyse statique
pub struct LintTasks;

impl TaskGroup for LintTasks {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn commands(&self, ctx: &OpsContext, cmd: &str, args: &str) -> Result<Vec<String>> {
        let tpl = "cargo {cmd} {args}";
        match cmd {
            "fmt" => Ok(vec![ctx.render(tpl, cmd, or_default(args, "--all -- --check"))]),
            "clippy" => Ok(vec![ctx.render(
                tpl,
                cmd,
                or_default(args, "--all-targets -- -D warnings"),
            )]),
            "all" => Ok(vec![
                ctx.render(tpl, "fmt", "--all -- --check"),
                ctx.render(tpl, "clippy", "--all-targets -- -D warnings"),
            ]),
            _ => Err(not_found(cmd)),
        }
    }
}

/// Groupe de tâches par nom (`dj` est un alias de `app`)
pub fn group(name: &str) -> Option<Box<dyn TaskGroup>> {
    match name {
        "docker" => Some(Box::new(DockerTasks)),
        "db" => Some(Box::new(DbTasks)),
        "app" | "dj" => Some(Box::new(AppTasks)),
        "lint" => Some(Box::new(LintTasks)),
        _ => None,
    }
}
