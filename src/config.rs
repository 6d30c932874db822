use std::env::var_os;
use std::fs::read_to_string;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::time::Duration;
use toml::from_str;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Collection endpoint of the remote contact store.
    pub remote_url: Url,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_request_limit")]
    pub request_limit: usize,
    #[serde(default = "default_notification_timeout_secs")]
    pub notification_timeout_secs: u64,
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let val = from_str(
            &read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?,
        )?;

        Ok(val)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}

pub fn config_path_from_env() -> PathBuf {
    var_os("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| "phonebook.toml".into())
}

fn default_bind_addr() -> SocketAddr {
    ([127, 0, 0, 1], 8080).into()
}

fn default_request_limit() -> usize {
    32
}

fn default_notification_timeout_secs() -> u64 {
    3
}
