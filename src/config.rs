//! neowatch configuration.
//!
//! Loaded from `~/.neowatch/config.toml` (or `--config`). Defaults apply when
//! the file is missing; every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

/// Public key accepted by the feed with tighter rate limits.
pub const DEMO_KEY: &str = "DEMO_KEY";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "NASA_API_KEY";

/// neowatch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Day offset for the first fetch after startup.
    pub first_offset: i32,

    /// Day offset for every subsequent fetch.
    pub offset: i32,

    /// Seconds between polls in `watch` mode.
    pub poll_secs: u64,

    /// Orbiting body to watch. Matched exactly.
    pub body: String,

    /// Store file. Defaults to `~/.neowatch/observed.json`.
    pub store: Option<PathBuf>,

    pub api_key: Option<String>,

    pub base_url: String,

    pub timeout_secs: u64,

    /// Upper bound of the random delay before each alert.
    pub pacing_secs: u64,

    /// Disables pacing.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_offset: 7,
            offset: 1,
            poll_secs: 3600,
            body: "Earth".to_string(),
            store: None,
            api_key: None,
            base_url: "https://api.nasa.gov".to_string(),
            timeout_secs: 30,
            pacing_secs: 120,
            debug: false,
        }
    }
}

impl Config {
    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        if config.body.is_empty() {
            return Err("body is empty; set it to an orbiting body such as \"Earth\"".to_string());
        }
        Ok(config)
    }

    /// The config file path: `~/.neowatch/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".neowatch").join("config.toml"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API key once: environment, then config, then the demo key.
    pub fn credentials(&self) -> Credentials {
        let from_env = env::var(API_KEY_VAR).ok();
        Credentials::resolve(from_env.as_deref(), self.api_key.as_deref())
    }
}

/// The resolved feed API key. Fixed for the life of the process.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// First non-empty candidate wins; falls back to [`DEMO_KEY`].
    pub fn resolve(from_env: Option<&str>, from_config: Option<&str>) -> Self {
        let api_key = [from_env, from_config]
            .into_iter()
            .flatten()
            .find(|k| !k.is_empty())
            .unwrap_or(DEMO_KEY);
        Self {
            api_key: api_key.to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_KEY
    }
}
