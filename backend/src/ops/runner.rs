// ops/runner.rs
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, instrument};

use super::style::{paint, DANGER, INFO, SECONDARY, WARNING};

/// Exécute les commandes produites par les groupes de tâches, dans l'ordre
#[derive(Debug, Clone)]
pub struct Runner {
    pub root: PathBuf,
    pub dry_run: bool,
}

impl Runner {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Affiche chaque commande (avec un compteur `[n/N]` s'il y en a plusieurs) puis l'exécute
    #[instrument(skip(self, commands), fields(count = commands.len()))]
    pub fn run(&self, commands: &[String]) -> Result<()> {
        let total = commands.len();

        for (n, command) in commands.iter().enumerate() {
            println!(
                "{} {}",
                paint(INFO, counter(n + 1, total)),
                paint(SECONDARY, command)
            );
            if self.dry_run {
                continue;
            }
            self.run_shell(command)?;
        }

        Ok(())
    }

    fn run_shell(&self, command: &str) -> Result<()> {
        debug!(command, "spawning shell");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.root)
            .status()
            .with_context(|| format!("failed to start command '{}'", command))?;

        if !status.success() {
            bail!("command failed with status {}: {}", status, command);
        }
        Ok(())
    }
}

pub fn counter(n: usize, total: usize) -> String {
    if total > 1 {
        format!("[{}/{}]", n, total)
    } else {
        String::new()
    }
}

/// Demande une confirmation `(y/N)` ; toute autre réponse que `y` annule
pub fn confirm_with<R: BufRead, W: Write>(prompt: &str, reader: &mut R, writer: &mut W) -> io::Result<bool> {
    write!(writer, "{}", paint(DANGER, format!("{} (y/N) ", prompt)))?;
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;

    let confirmed = answer.trim().eq_ignore_ascii_case("y");
    if !confirmed {
        writeln!(writer, "{}", paint(WARNING, "[Aborted]"))?;
    }
    Ok(confirmed)
}

pub fn confirm(prompt: &str) -> io::Result<bool> {
    confirm_with(prompt, &mut io::stdin().lock(), &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("y\n", true)]
    #[case("Y\n", true)]
    #[case(" y \n", true)]
    #[case("yes\n", false)]
    #[case("\n", false)]
    #[case("", false)]
    fn confirm_accepts_only_y(#[case] input: &str, #[case] expected: bool) {
        let mut reader = input.as_bytes();
        let mut output = Vec::new();

        let confirmed = confirm_with("Are you sure?", &mut reader, &mut output).unwrap();

        assert_eq!(confirmed, expected);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Are you sure? (y/N)"));
        assert_eq!(printed.contains("[Aborted]"), !expected);
    }

    #[test]
    fn counter_is_shown_only_for_batches() {
        assert_eq!(counter(1, 1), "");
        assert_eq!(counter(2, 3), "[2/3]");
    }

    #[test]
    fn dry_run_executes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(dir.path(), true);

        runner.run(&["touch created".to_string()]).unwrap();

        assert!(!dir.path().join("created").exists());
    }

    #[test]
    fn commands_run_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(dir.path(), false);

        runner
            .run(&["mkdir -p backups".to_string(), "touch backups/marker".to_string()])
            .unwrap();

        assert!(dir.path().join("backups/marker").exists());
        assert!(runner.run(&["exit 3".to_string()]).is_err());
    }
}
