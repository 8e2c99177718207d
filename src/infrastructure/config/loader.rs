//! Locating, reading and repairing `config.toml`.

use super::app_config::{AppConfig, EditorConfig, UiConfig};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file existed, defaults were written to it.
    Created(PathBuf),
    /// Parsed from an existing file.
    File(PathBuf),
    /// The file did not parse and was left untouched.
    Defaults { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(path) => write!(f, "{} (created)", path.display()),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults { path, .. } => write!(f, "defaults ({} unreadable)", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
    /// Settings replaced because their value was unusable.
    pub repaired: Vec<&'static str>,
}

/// Reads the editor configuration from the platform config directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigDirNotFound` when the platform has no home
    /// directory to derive one from.
    pub fn new() -> Result<Self, ConfigError> {
        AppConfig::default_config_dir()
            .map(Self::in_dir)
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    #[must_use]
    pub const fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File read for the given `--config` value.
    #[must_use]
    pub fn path_for(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Loads the configuration, writing defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults cannot
    /// be written.
    pub fn load(&self, path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let path = self.path_for(path_override);

        let (mut config, source) = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<AppConfig>(&content) {
                Ok(config) => (config, ConfigSource::File(path)),
                Err(e) => {
                    warn!(
                        error = %e,
                        path = %path.display(),
                        "Config does not parse, using defaults"
                    );
                    let reason = e.message().to_string();
                    (AppConfig::default(), ConfigSource::Defaults { path, reason })
                }
            }
        } else {
            info!(path = %path.display(), "Writing default config");
            let config = AppConfig::default();
            write_atomic(&path, &config)?;
            (config, ConfigSource::Created(path))
        };

        let repaired = repair(&mut config);
        Ok(LoadedConfig {
            config,
            source,
            repaired,
        })
    }
}

/// Replaces values the editor cannot run with and names them.
fn repair(config: &mut AppConfig) -> Vec<&'static str> {
    let mut repaired = Vec::new();

    let categories = &mut config.editor.categories;
    categories.retain(|c| !c.trim().is_empty());
    if categories.is_empty() {
        *categories = EditorConfig::default().categories;
        repaired.push("editor.categories");
    }
    if config.editor.autosave_interval_secs == 0 {
        config.editor.autosave_interval_secs = EditorConfig::default().autosave_interval_secs;
        repaired.push("editor.autosave_interval_secs");
    }
    if config.ui.timestamp_format.trim().is_empty() {
        config.ui.timestamp_format = UiConfig::default().timestamp_format;
        repaired.push("ui.timestamp_format");
    }

    repaired
}

fn write_atomic(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(content.as_bytes())?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
