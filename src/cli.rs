//! CLI interface for neowatch.
//!
//! Each command loads the configuration, resolves the API key once, and
//! drives a [`Watcher`] against the NeoWs feed:
//!
//! - `neowatch first-fetch`: one check with the first-run window.
//! - `neowatch fetch [--days N]`: one check with the polling window.
//! - `neowatch watch`: first-fetch, then fetch on every poll tick.
//! - `neowatch seen`: list everything already reported.
//!
//! Alerts go to stdout; logs go to stderr.

mod format;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rand::Rng;

use crate::config::Config;
use crate::feed::NeoWsFeed;
use crate::model::TrackedObject;
use crate::storage::Storage;
use crate::watch::{WatchError, Watcher};

use format::{format_alert, pick_adjective};

/// neowatch: alerts for newly seen hazardous near-Earth objects.
#[derive(Debug, Parser)]
#[command(name = "neowatch", after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Config file (default: `~/.neowatch/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store file, overriding the config (default: `~/.neowatch/observed.json`).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r#"Examples:
  NASA_API_KEY=... neowatch first-fetch
  neowatch fetch --days -3
  neowatch --store /var/lib/neowatch/observed.json watch

The window is a day offset from today and may not exceed 7 days either way."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check once using the configured first-run window.
    FirstFetch,

    /// Check once using the configured polling window.
    Fetch {
        /// Day offset overriding the configured window (-7 to 7).
        #[arg(long, allow_hyphen_values = true)]
        days: Option<i32>,
    },

    /// First-fetch, then fetch every poll interval until interrupted.
    ///
    /// Failed checks are logged and retried on the next tick.
    Watch,

    /// List every object already reported.
    Seen,
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli) -> Result<(), String> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path().ok_or("could not determine home directory")?,
    };
    let config = Config::load(&config_path)?;

    let store = match cli.store.or_else(|| config.store.clone()) {
        Some(path) => path,
        None => Storage::default_path().ok_or("could not determine home directory")?,
    };
    let storage =
        Storage::new(&store).map_err(|e| format!("failed to open {}: {e}", store.display()))?;

    match cli.command {
        Command::Seen => cmd_seen(&storage),
        Command::FirstFetch => {
            let watcher = build_watcher(&config, storage)?;
            cmd_check(&config, &watcher, Watcher::first_fetch)
        }
        Command::Fetch { days } => {
            let watcher = build_watcher(&config, storage)?;
            match days {
                Some(days) => cmd_check(&config, &watcher, |w| w.fetch_novel_hazards(days)),
                None => cmd_check(&config, &watcher, Watcher::fetch),
            }
        }
        Command::Watch => {
            let watcher = build_watcher(&config, storage)?;
            cmd_watch(&config, &watcher)
        }
    }
}

fn build_watcher(config: &Config, storage: Storage) -> Result<Watcher<NeoWsFeed>, String> {
    let credentials = config.credentials();
    if credentials.is_demo() {
        tracing::warn!(
            "no API key configured; using the demo key, which is heavily rate limited \
             (set NASA_API_KEY or api-key in the config)"
        );
    }
    let feed = NeoWsFeed::new(&config.base_url, credentials, config.timeout())
        .map_err(|e| format!("failed to build HTTP client: {e}"))?;

    Ok(Watcher::new(
        feed,
        storage,
        config.body.clone(),
        config.first_offset,
        config.offset,
    ))
}

fn cmd_check<F>(config: &Config, watcher: &Watcher<NeoWsFeed>, check: F) -> Result<(), String>
where
    F: Fn(&Watcher<NeoWsFeed>) -> Result<Vec<TrackedObject>, WatchError>,
{
    tracing::debug!(store = %watcher.storage().path().display(), "checking once");
    let novel = check(watcher).map_err(|e| describe_watch_error(&e))?;
    emit(config, watcher.body(), &novel);
    Ok(())
}

fn cmd_watch(config: &Config, watcher: &Watcher<NeoWsFeed>) -> Result<(), String> {
    let interval = config.poll_interval();
    tracing::info!(poll_secs = interval.as_secs(), "watching");

    tick(config, watcher, Watcher::first_fetch);
    loop {
        thread::sleep(interval);
        tick(config, watcher, Watcher::fetch);
    }
}

/// One polling tick. Errors are logged; the next tick is the retry.
fn tick<F>(config: &Config, watcher: &Watcher<NeoWsFeed>, check: F)
where
    F: Fn(&Watcher<NeoWsFeed>) -> Result<Vec<TrackedObject>, WatchError>,
{
    match check(watcher) {
        Ok(novel) => emit(config, watcher.body(), &novel),
        Err(e) if e.is_rate_limited() => tracing::warn!("{}", describe_watch_error(&e)),
        Err(e) => tracing::error!("{}", describe_watch_error(&e)),
    }
}

fn cmd_seen(storage: &Storage) -> Result<(), String> {
    let observed = storage
        .load()
        .map_err(|e| format!("failed to load {}: {e}", storage.path().display()))?;

    if observed.is_empty() {
        println!("Nothing reported yet");
        return Ok(());
    }

    for object in &observed {
        let (date, body) = object
            .first_approach()
            .map_or(("-", "-"), |a| {
                (a.close_approach_date.as_str(), a.orbiting_body.as_str())
            });
        println!("{}  {date}  {body}  {}", object.id, object.name);
    }

    Ok(())
}

/// Prints one alert per novel object, pacing them unless in debug mode.
fn emit(config: &Config, body: &str, novel: &[TrackedObject]) {
    let mut rng = rand::thread_rng();
    for object in novel {
        pace(config, &mut rng);
        match format_alert(object, body, pick_adjective(&mut rng)) {
            Ok(alert) => println!("{alert}"),
            Err(e) => tracing::warn!("skipping alert: {e}"),
        }
    }
}

fn pace<R: Rng>(config: &Config, rng: &mut R) {
    if config.debug || config.pacing_secs == 0 {
        return;
    }
    let delay = Duration::from_secs(rng.gen_range(0..=config.pacing_secs));
    tracing::debug!(delay_secs = delay.as_secs(), "pacing before next alert");
    thread::sleep(delay);
}

fn describe_watch_error(e: &WatchError) -> String {
    match e {
        WatchError::Range(_) => format!("invalid window: {e}"),
        WatchError::Feed(_) => format!("feed check failed: {e}"),
        WatchError::Storage(_) => format!("store update failed: {e}"),
        WatchError::Parse(_) => format!("feed data rejected: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_days() {
        let cli = Cli::try_parse_from(["neowatch", "fetch", "--days", "-3"]).unwrap();
        assert!(matches!(cli.command, Command::Fetch { days: Some(-3) }));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["neowatch", "seen", "--store", "/tmp/x.json", "--log-level", "debug"])
                .unwrap();
        assert!(matches!(cli.command, Command::Seen));
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/x.json")));
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn debug_disables_pacing() {
        let config = Config {
            debug: true,
            ..Config::default()
        };
        let start = std::time::Instant::now();
        pace(&config, &mut rand::thread_rng());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn describes_range_errors() {
        let err = WatchError::from(crate::model::FetchWindow::new(9).unwrap_err());
        assert!(describe_watch_error(&err).starts_with("invalid window"));
    }
}
