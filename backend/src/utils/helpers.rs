// utils/helpers.rs
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

/// Exécuter une opération asynchrone jusqu'à `max_attempts` fois
///
/// La dernière erreur est renvoyée telle quelle si toutes les tentatives échouent.
pub async fn try_it<T, E, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "attempt failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Mesure la durée d'un bloc et la journalise à la destruction
///
/// ```ignore
/// let _timer = TimeIt::new("migrations");
/// database.migrate().await?;
/// ```
pub struct TimeIt {
    label: String,
    start: Instant,
}

impl TimeIt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimeIt {
    fn drop(&mut self) {
        tracing::info!(
            label = %self.label,
            duration = format!("{:.4}s", self.elapsed().as_secs_f64()),
            "timed"
        );
    }
}
