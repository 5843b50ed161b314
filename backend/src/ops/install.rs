// ops/install.rs
//! Installation d'un environnement : copie des modèles puis génération des secrets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use super::context::OpsContext;
use super::secrets::{generate_fernet_key, generate_secret};
use super::style::{paint, INFO, NORMAL, SECONDARY, SUCCESS, WARNING};

const TEMPLATE_SUFFIX: &str = ".example";

/// Copie `app.env.example` et `docker-compose.yml.example` puis renseigne le compose
///
/// Les fichiers existants sont remplacés ; retourne `false` si l'utilisateur refuse.
pub fn setup(ctx: &OpsContext, confirm: impl FnOnce(&str) -> Result<bool>) -> Result<bool> {
    if !confirm(
        "Are you sure you want to setup the project? Notice, it will replace the existing files!",
    )? {
        return Ok(false);
    }

    let env_dir = ctx.root.join(ctx.env_dir());
    println!("{} {}", paint(INFO, "Env directory"), paint(NORMAL, env_dir.display()));
    let targets = [env_dir.join("app.env"), env_dir.join("docker-compose.yml")];

    for target in &targets {
        let template = template_path(target);
        if !template.exists() {
            bail!("template not found: {}", template.display());
        }
        fs::copy(&template, target)
            .with_context(|| format!("unable to copy {}", template.display()))?;
        println!("{} {}", paint(INFO, "created"), paint(SECONDARY, target.display()));
    }

    replace_placeholders(
        &env_dir.join("docker-compose.yml"),
        &[
            ("<PROJECT_NAME>", ctx.project_name.clone()),
            ("<APP_NAME>", ctx.app_name.clone()),
            ("<APP_PORT>", ctx.app_port.clone()),
        ],
    )?;

    println!("{}", paint(SUCCESS, "Env copied."));
    println!("{}", paint(WARNING, "Run `ops keygen` to replace the placeholder secrets"));
    Ok(true)
}

/// Renseigne les secrets du fichier d'environnement
pub fn keygen(ctx: &OpsContext, confirm: impl FnOnce(&str) -> Result<bool>) -> Result<bool> {
    let env_file = ctx.root.join(ctx.env_file());
    if !env_file.exists() {
        bail!("Env file not found: {}, run `ops setup` first", env_file.display());
    }

    if !confirm("Are you sure you want to generate keys? Notice, it could replace the existing keys values!")? {
        return Ok(false);
    }

    let replaced = replace_placeholders(
        &env_file,
        &[
            ("<POSTGRES_PASSWORD>", generate_secret(16, true, true, false)?),
            ("<SECRET_KEY>", generate_secret(50, true, true, true)?),
            ("<JWT_SIGNING_KEY>", generate_secret(64, true, true, true)?),
            ("<JWT_PAYLOAD_ENCRYPTION_KEY>", generate_fernet_key()),
        ],
    )?;

    if replaced == 0 {
        println!("{}", paint(WARNING, "No placeholder left, secrets were already generated"));
    } else {
        println!("{}", paint(SUCCESS, format!("{} secret(s) generated", replaced)));
    }
    Ok(true)
}

fn template_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(TEMPLATE_SUFFIX);
    PathBuf::from(name)
}

/// Nombre de marqueurs effectivement remplacés
fn replace_placeholders(path: &Path, values: &[(&str, String)]) -> Result<usize> {
    let mut content = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;

    let mut replaced = 0;
    for (placeholder, value) in values {
        if content.contains(placeholder) {
            content = content.replace(placeholder, value);
            replaced += 1;
        }
    }

    fs::write(path, content).with_context(|| format!("unable to write {}", path.display()))?;
    info!(path = %path.display(), replaced, "placeholders replaced");
    Ok(replaced)
}
