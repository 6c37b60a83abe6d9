use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_SECRET_PATH: &str = "/run/secrets/api_football_key";

/// Configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API-Football key. `None` is allowed here; the client reports it on
    /// first use.
    pub api_key: Option<String>,
    /// Where the key was looked for when not set in the environment
    pub secret_path: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub server_port: u16,
    /// Picks below this normalized probability are discarded
    pub min_pick_probability: f64,
    pub max_picks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_path: DEFAULT_SECRET_PATH.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            server_port: 8084,
            min_pick_probability: 0.8,
            max_picks: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // Secrets:
        // - API_FOOTBALL_KEY env var
        // - otherwise a mounted secret file, if present
        let secret_path =
            env::var("API_FOOTBALL_KEY_FILE").unwrap_or_else(|_| defaults.secret_path.clone());

        let api_key = match env::var("API_FOOTBALL_KEY") {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
            Ok(_) => return Err(anyhow!("API_FOOTBALL_KEY is set but empty")),
            Err(_) if Path::new(&secret_path).exists() => {
                Some(read_secret_file(&secret_path, "api_football_key")?)
            }
            Err(_) => None,
        };

        if let Some(key) = &api_key {
            check_not_placeholder(key)?;
        }

        Ok(Self {
            api_key,
            secret_path,
            base_url: env::var("API_FOOTBALL_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_seconds: parse_env("HTTP_TIMEOUT_SECONDS", defaults.timeout_seconds),
            connect_timeout_seconds: parse_env(
                "HTTP_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            ),
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            min_pick_probability: parse_env("MIN_PICK_PROBABILITY", defaults.min_pick_probability),
            max_picks: parse_env("MAX_PICKS", defaults.max_picks),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Prevent accidental use of sample/placeholder keys
fn check_not_placeholder(key: &str) -> Result<()> {
    let key_lower = key.trim().to_lowercase();
    if key_lower.contains("change_me")
        || key_lower.contains("your_")
        || key_lower.starts_with("sample")
    {
        return Err(anyhow!(
            "API_FOOTBALL_KEY appears to be a placeholder value; replace with your real key"
        ));
    }
    Ok(())
}

/// Read a secret from a mounted secret file
fn read_secret_file(file_path: &str, secret_name: &str) -> Result<String> {
    let secret = std::fs::read_to_string(file_path)
        .map(|s| s.trim().to_string())
        .with_context(|| format!("Failed to read secret {} at {}", secret_name, file_path))?;

    if secret.is_empty() {
        return Err(anyhow!("Secret file {} ({}) is empty", file_path, secret_name));
    }
    Ok(secret)
}
