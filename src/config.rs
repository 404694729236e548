//! Environment-driven configuration.

use std::env;
use std::path::{Path, PathBuf};

use crate::models::Channel;

const DEFAULT_CHANNELS: &str = "Facebook,Google,TikTok";
const LEGACY_DATA_DIR: &str = "Marketing Intelligence Dashboard";

/// Deployment environment name (`ENVIRONMENT`, defaults to `sandbox`).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// HTTP port for the API server (`PORT`, defaults to 8080).
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// One per-channel export and the channel it is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSource {
    pub channel: Channel,
    pub path: PathBuf,
}

/// Locations of every input file.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub channels: Vec<ChannelSource>,
    pub business_path: PathBuf,
}

impl DataConfig {
    /// Build the layout for a data directory: `<Channel>.csv` per channel plus `business.csv`.
    pub fn new(data_dir: impl Into<PathBuf>, channels: &[Channel]) -> Self {
        let data_dir = data_dir.into();
        let channels = channels
            .iter()
            .map(|channel| ChannelSource {
                channel: channel.clone(),
                path: data_dir.join(format!("{}.csv", channel.as_str())),
            })
            .collect();
        let business_path = data_dir.join("business.csv");
        Self {
            data_dir,
            channels,
            business_path,
        }
    }

    /// Resolve the data directory and channel list from the environment.
    ///
    /// `DATA_DIR` wins when it points at an existing directory; otherwise `./data`, then the legacy
    /// export folder, then the working directory itself. Missing files are not an error here.
    pub fn from_env() -> Self {
        let root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let data_dir = resolve_data_dir(env::var("DATA_DIR").ok().as_deref(), &root);
        let channels = parse_channel_list(
            &env::var("CHANNELS").unwrap_or_else(|_| DEFAULT_CHANNELS.to_string()),
        );
        Self::new(data_dir, &channels)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::new("data", &parse_channel_list(DEFAULT_CHANNELS))
    }
}

pub fn resolve_data_dir(override_dir: Option<&str>, root: &Path) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        let candidate = PathBuf::from(dir);
        if candidate.is_dir() {
            return candidate;
        }
        tracing::warn!(data_dir = %dir, "DATA_DIR does not exist, falling back to defaults");
    }
    let default_dir = root.join("data");
    if default_dir.is_dir() {
        return default_dir;
    }
    let legacy_dir = root.join(LEGACY_DATA_DIR);
    if legacy_dir.is_dir() {
        return legacy_dir;
    }
    root.to_path_buf()
}

/// Parse a comma-separated channel list, skipping blanks and duplicates.
pub fn parse_channel_list(raw: &str) -> Vec<Channel> {
    let mut channels: Vec<Channel> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let channel = Channel::from_name(name);
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    channels
}

/// Defaults for the interactive views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardDefaults {
    pub rolling_window: usize,
    pub lookback_days: i64,
    pub top_n: usize,
    pub outlier_z_threshold: f64,
    pub max_lag_days: usize,
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            lookback_days: 60,
            top_n: 5,
            outlier_z_threshold: 3.0,
            max_lag_days: 3,
        }
    }
}
