//! Configuration loading
//!
//! Settings resolve in priority order: command-line argument (applied by
//! the binaries), environment variable, TOML config file, compiled default.
//! The config file lives at `~/.config/versecast/config.toml` unless
//! overridden via `--config` or `VERSECAST_CONFIG`.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Shared settings for both surfaces; the display binary ignores the
/// operator-only fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Operator HTTP API port
    pub http_port: u16,
    /// Multicast group the surface channel joins
    pub group_addr: Ipv4Addr,
    /// Multicast port
    pub group_port: u16,
    /// Heartbeat ping interval, seconds
    pub ping_interval_secs: u64,
    /// Liveness timeout as a multiple of the ping interval
    pub liveness_timeout_factor: u32,
    /// Directory holding the corpus JSON files
    pub data_dir: PathBuf,
    /// Direct mode: content bypasses the preview slot and goes straight live
    pub direct_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_port: 5850,
            group_addr: Ipv4Addr::new(239, 255, 71, 88),
            group_port: 5851,
            ping_interval_secs: 3,
            liveness_timeout_factor: 2,
            data_dir: default_data_dir(),
            direct_mode: false,
        }
    }
}

impl Settings {
    /// Load settings, falling back to compiled defaults when no config file
    /// exists. A file that exists but does not parse is an error; silently
    /// running with defaults in that case would mask an operator mistake.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var("VERSECAST_CONFIG") {
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => default_config_path(),
            },
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !self.group_addr.is_multicast() {
            return Err(Error::Config(format!(
                "group_addr {} is not a multicast address",
                self.group_addr
            )));
        }
        if self.ping_interval_secs == 0 || self.liveness_timeout_factor == 0 {
            return Err(Error::Config(
                "ping interval and timeout factor must be nonzero".into(),
            ));
        }
        Ok(())
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    /// Window without a reply after which a surface is classified
    /// Disconnected
    pub fn liveness_timeout(&self) -> Duration {
        self.ping_interval() * self.liveness_timeout_factor
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("versecast").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("versecast").join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let s = Settings::default();
        assert!(s.group_addr.is_multicast());
        assert_eq!(s.liveness_timeout(), Duration::from_secs(6));
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ping_interval_secs = 5\ndirect_mode = true\n").unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.ping_interval_secs, 5);
        assert!(s.direct_mode);
        assert_eq!(s.http_port, Settings::default().http_port);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "group_addr = \"10.0.0.1\"").unwrap();
        assert!(matches!(Settings::load(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(s.http_port, Settings::default().http_port);
    }
}
