use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How outcomes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Checksum OK<TAB>digest<TAB>path` lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Global configuration loaded from `~/.config/chksum/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChksumConfig {
    /// Digest worker threads for batches; if missing, one per CPU.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Default output format: "text" or "json".
    #[serde(default)]
    pub output: OutputFormat,
    /// Print paths relative to the current directory when they are below it.
    #[serde(default = "default_relative_paths")]
    pub relative_paths: bool,
}

fn default_relative_paths() -> bool {
    true
}

impl Default for ChksumConfig {
    fn default() -> Self {
        Self {
            workers: None,
            output: OutputFormat::Text,
            relative_paths: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("chksum")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ChksumConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ChksumConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file; it must exist.
pub fn load_from(path: &Path) -> Result<ChksumConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ChksumConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
