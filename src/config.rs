use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_EMBED_BASE: &str = "https://vidsrc.to/embed";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub embed_base_url: String,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(tmdb_api_key: impl Into<String>) -> Self {
        Self {
            tmdb_api_key: tmdb_api_key.into(),
            tmdb_base_url: DEFAULT_TMDB_BASE.to_string(),
            embed_base_url: DEFAULT_EMBED_BASE.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3146)),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        let tmdb_api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("TMDB_API_KEY not set")?;

        let tmdb_base_url = env_or("TMDB_BASE_URL", DEFAULT_TMDB_BASE);
        let embed_base_url = env_or("EMBED_BASE_URL", DEFAULT_EMBED_BASE);
        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3146")?;
        let timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url: trim_base(tmdb_base_url),
            embed_base_url: trim_base(embed_base_url),
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    pub fn with_tmdb_base(mut self, base: impl Into<String>) -> Self {
        self.tmdb_base_url = trim_base(base.into());
        self
    }

    pub fn with_embed_base(mut self, base: impl Into<String>) -> Self {
        self.embed_base_url = trim_base(base.into());
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn trim_base(base: String) -> String {
    base.trim().trim_end_matches('/').to_string()
}
