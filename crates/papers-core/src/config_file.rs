use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Config, LOCAL_API_BASE, PapersError};

/// Environment variable overriding the papers service base URL.
pub const API_BASE_ENV: &str = "PAPERS_API_BASE";

/// Environment variable holding the tracing filter directive for both binaries.
pub const LOG_ENV: &str = "PAPERS_LOG";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
}

/// Command-line inputs that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub local: bool,
}

/// Platform config directory path: `<config_dir>/papers/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("papers").join("config.toml"))
}

/// Load config by cascading CWD `.papers.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".papers.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let base_storage = base.storage.unwrap_or_default();
    let server = overlay.server.unwrap_or_default();
    let display = overlay.display.unwrap_or_default();
    let storage = overlay.storage.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            base_url: server.base_url.or(base_server.base_url),
            timeout_secs: server.timeout_secs.or(base_server.timeout_secs),
        }),
        display: Some(DisplayConfig {
            theme: display.theme.or(base_display.theme),
        }),
        storage: Some(StorageConfig {
            data_dir: storage.data_dir.or(base_storage.data_dir),
            download_dir: storage.download_dir.or(base_storage.download_dir),
        }),
    }
}

/// Save a config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, PapersError> {
    let path = config_path()
        .ok_or_else(|| PapersError::Config("could not determine config directory".into()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| PapersError::Config(format!("failed to serialize config: {e}")))?;
    std::fs::write(&path, content)?;
    Ok(path)
}

impl ConfigFile {
    /// Theme named in `[display]`, if any.
    pub fn theme(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Resolve the effective [`Config`] from flags, environment and file.
///
/// Base URL precedence: `--base-url` > `--local` > `PAPERS_API_BASE` > file >
/// deployed default.
pub fn resolve(file: &ConfigFile, overrides: &Overrides) -> Config {
    let env_base = std::env::var(API_BASE_ENV).ok();
    resolve_with_env(file, overrides, env_base.as_deref())
}

fn resolve_with_env(file: &ConfigFile, overrides: &Overrides, env_base: Option<&str>) -> Config {
    let mut config = Config::default();
    let non_empty = |s: &&str| !s.trim().is_empty();

    let file_base = file.server.as_ref().and_then(|s| s.base_url.as_deref());
    let local = overrides.local.then_some(LOCAL_API_BASE);
    if let Some(url) = overrides
        .base_url
        .as_deref()
        .filter(non_empty)
        .or(local)
        .or(env_base.filter(non_empty))
        .or(file_base.filter(non_empty))
    {
        config.base_url = url.trim().trim_end_matches('/').to_string();
    }

    if let Some(secs) = file.server.as_ref().and_then(|s| s.timeout_secs) {
        config.timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(storage) = &file.storage {
        if let Some(dir) = &storage.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &storage.download_dir {
            config.download_dir = dir.clone();
        }
    }
    config
}
