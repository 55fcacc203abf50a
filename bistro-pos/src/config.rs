//! Till configuration
//!
//! # Environment variables
//!
//! Everything [`ClientConfig`] reads, plus:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | BISTRO_LOG_LEVEL | info | Log filter (`info`, `debug`, `bistro_pos=trace`, ...) |
//! | BISTRO_LOG_DIR | unset | Directory for daily rolling log files |
//! | BISTRO_RESTAURANT_NAME | Bistro | Name printed on tickets |
//! | BISTRO_TERMINAL_NAME | till | Name announced on the live channel |

use std::path::PathBuf;

use bistro_client::{ClientConfig, ClientResult, LiveConfig};

#[derive(Debug, Clone)]
pub struct TillConfig {
    pub client: ClientConfig,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub restaurant_name: String,
    pub terminal_name: String,
}

impl TillConfig {
    /// Load from the process environment (and `.env` if present)
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Ok(Self {
            client: ClientConfig::from_lookup(&lookup)?,
            log_level: non_empty("BISTRO_LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: non_empty("BISTRO_LOG_DIR").map(PathBuf::from),
            restaurant_name: non_empty("BISTRO_RESTAURANT_NAME")
                .unwrap_or_else(|| "Bistro".into()),
            terminal_name: non_empty("BISTRO_TERMINAL_NAME").unwrap_or_else(|| "till".into()),
        })
    }

    /// Live channel settings for this terminal
    pub fn live(&self) -> LiveConfig {
        LiveConfig::from(&self.client).with_client_name(self.terminal_name.clone())
    }
}
