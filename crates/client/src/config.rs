//! Client configuration loaded from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::ports::outbound::TransportError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_PATH: &str = "/sc2api";
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 60;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
pub const BACKOFF_MULTIPLIER: f64 = 2.0;
pub const JITTER_FACTOR: f64 = 0.2;

/// Connection retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total connection attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// Jitter factor (0.0-1.0) applied around each delay
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONNECT_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            multiplier: BACKOFF_MULTIPLIER,
            jitter_factor: JITTER_FACTOR,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting. Handy for tests and one-shot tools.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            jitter_factor: 0.0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub api_path: String,
    pub retry: RetryConfig,
    /// How often `wait_for_*` pings the game
    pub poll_interval: Duration,
    /// Optional deadline applied to every response the game client waits for
    pub response_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_path: DEFAULT_API_PATH.to_string(),
            retry: RetryConfig::default(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            response_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Build the configuration from `SC2_*` environment variables.
    ///
    /// Missing variables fall back to defaults; unparsable ones are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let retry = RetryConfig {
            max_attempts: parse_or(&var, "SC2_CONNECT_ATTEMPTS", defaults.retry.max_attempts)
                .max(1),
            initial_delay_ms: parse_or(
                &var,
                "SC2_RETRY_INITIAL_DELAY_MS",
                defaults.retry.initial_delay_ms,
            ),
            max_delay_ms: parse_or(&var, "SC2_RETRY_MAX_DELAY_MS", defaults.retry.max_delay_ms),
            ..defaults.retry
        };

        let poll_interval_ms = parse_or(&var, "SC2_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let response_timeout = var("SC2_RESPONSE_TIMEOUT_MS").and_then(|raw| match raw.parse() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(e) => {
                tracing::warn!(key = "SC2_RESPONSE_TIMEOUT_MS", value = %raw, error = %e, "Ignoring invalid value");
                None
            }
        });

        Self {
            host: var("SC2_HOST").unwrap_or(defaults.host),
            port: parse_or(&var, "SC2_PORT", defaults.port),
            api_path: var("SC2_API_PATH").unwrap_or(defaults.api_path),
            retry,
            poll_interval: Duration::from_millis(poll_interval_ms),
            response_timeout,
        }
    }

    /// WebSocket endpoint, e.g. `ws://127.0.0.1:5000/sc2api`.
    pub fn ws_url(&self) -> Result<Url, TransportError> {
        let mut url = Url::parse(&format!("ws://{}:{}", self.host, self.port))?;
        url.set_path(&self.api_path);
        Ok(url)
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid value");
                default
            }
        },
        None => default,
    }
}

/// Env files checked in the workspace root, highest priority first.
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Outcome of loading the env files, kept so it can be logged once tracing is up.
#[derive(Debug, Default)]
pub struct EnvFiles {
    pub loaded: Vec<PathBuf>,
    pub rejected: Vec<(PathBuf, String)>,
}

/// Load `.env.local` then `.env` from the workspace root.
///
/// Variables already set in the process environment win, so `.env.local`
/// overrides `.env` and both yield to the real environment.
pub fn load_dotenv_from_repo_root() -> EnvFiles {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.ancestors().nth(2).unwrap_or(manifest_dir);
    load_env_files(workspace_root)
}

fn load_env_files(dir: &Path) -> EnvFiles {
    let mut files = EnvFiles::default();
    for path in ENV_FILES.iter().map(|name| dir.join(name)) {
        match dotenvy::from_path(&path) {
            Ok(()) => files.loaded.push(path),
            Err(e) if e.not_found() => {}
            Err(e) => files.rejected.push((path, e.to_string())),
        }
    }
    files
}
