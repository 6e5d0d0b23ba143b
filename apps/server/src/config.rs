//! Server configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    pub bind_address: IpAddr,

    /// Port to bind the HTTP server to.
    /// Override: `CRESCENDO_BIND_PORT`
    pub bind_port: u16,

    /// Path to the `yt-dlp` executable.
    /// Override: `CRESCENDO_YTDLP_PATH`
    pub ytdlp_path: PathBuf,

    /// How long each track "plays" on the simulated audio output (seconds).
    pub simulated_track_secs: u64,

    /// Playback and queue view settings passed to the core.
    /// `playback.auto_leave_on_empty` override: `CRESCENDO_AUTO_LEAVE`
    pub playback: crescendo_core::Config,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            bind_port: 8640,
            ytdlp_path: PathBuf::from("yt-dlp"),
            simulated_track_secs: 180,
            playback: crescendo_core::Config::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CRESCENDO_BIND_PORT") {
            if let Ok(port) = val.parse() {
                self.bind_port = port;
            }
        }

        if let Ok(val) = std::env::var("CRESCENDO_AUTO_LEAVE") {
            if let Ok(auto_leave) = val.parse() {
                self.playback.auto_leave_on_empty = auto_leave;
            }
        }

        if let Ok(val) = std::env::var("CRESCENDO_YTDLP_PATH") {
            if !val.trim().is_empty() {
                self.ytdlp_path = PathBuf::from(val);
            }
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ServerConfig::parse("{}").unwrap();
        assert_eq!(config.bind_port, 8640);
        assert!(config.playback.auto_leave_on_empty);
        assert_eq!(config.playback.page_size, 10);
    }

    #[test]
    fn nested_playback_settings_are_read() {
        let config = ServerConfig::parse(
            "bind_port: 9000\nplayback:\n  auto_leave_on_empty: false\n  page_size: 5\n",
        )
        .unwrap();
        assert_eq!(config.bind_addr().port(), 9000);
        assert!(!config.playback.auto_leave_on_empty);
        assert_eq!(config.playback.page_size, 5);
        assert_eq!(config.playback.view_timeout_secs, 60);
    }
}
