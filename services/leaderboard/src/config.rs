use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Concurrent evaluations; intake never blocks on this.
    pub eval_workers: usize,
    /// TTL for cached leaderboard snapshots. Completions invalidate early.
    pub cache_ttl: Duration,
    pub hf_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("LB_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let eval_workers: usize = std::env::var("LB_EVAL_WORKERS")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .context("LB_EVAL_WORKERS must be an integer")?;

        let cache_ttl_secs: u64 = std::env::var("LB_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("LB_CACHE_TTL_SECS must be an integer")?;

        let hf_base_url = std::env::var("LB_HF_BASE_URL")
            .unwrap_or_else(|_| "https://datasets-server.huggingface.co".to_string());

        // Fail fast, fail loud.
        if eval_workers == 0 {
            bail!("LB_EVAL_WORKERS must be at least 1");
        }
        if !hf_base_url.starts_with("http://") && !hf_base_url.starts_with("https://") {
            bail!("LB_HF_BASE_URL must start with http:// or https://");
        }

        Ok(Self {
            bind_addr,
            eval_workers,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            hf_base_url,
        })
    }
}
