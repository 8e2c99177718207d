//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::entities::FallbackSources;

pub(crate) const APP_NAME: &str = "studio-press";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "northwind";

/// Environment variable overriding `remote.url`.
pub const REMOTE_URL_ENV: &str = "STUDIO_PRESS_REMOTE_URL";
/// Environment variable overriding `remote.api_key`.
pub const REMOTE_KEY_ENV: &str = "STUDIO_PRESS_REMOTE_KEY";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from TOML and merged with CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Ignore the remote store even when configured.
    #[serde(skip)]
    pub offline: bool,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Editor behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Seconds between autosave ticks.
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,

    /// Categories offered by the editor. The first one is the default.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl EditorConfig {
    /// Autosave period, never shorter than one second.
    #[must_use]
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    /// Category preselected for new posts.
    #[must_use]
    pub fn default_category(&self) -> &str {
        self.categories.first().map_or("", String::as_str)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: default_autosave_interval_secs(),
            categories: default_categories(),
        }
    }
}

/// Local key-value storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum serialized size of the store.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,

    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            quota_bytes: default_quota_bytes(),
            data_dir: None,
        }
    }
}

/// Hosted content store credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Returns url and key when both are present and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|u| !u.trim().is_empty())?;
        let key = self.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some((url, key))
    }

    /// Overrides values with the process environment when set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(REMOTE_URL_ENV) {
            self.url = Some(url);
        }
        if let Ok(key) = std::env::var(REMOTE_KEY_ENV) {
            self.api_key = Some(key);
        }
    }
}

/// Lead form relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL; submissions go to `{endpoint}/{form_id}`.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_contact_form")]
    pub contact_form: String,

    #[serde(default = "default_newsletter_form")]
    pub newsletter_form: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            contact_form: default_contact_form(),
            newsletter_form: default_newsletter_form(),
        }
    }
}

/// Fallback image sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_team_fallback")]
    pub team_fallback: String,

    #[serde(default = "default_blog_fallback")]
    pub blog_fallback: String,

    #[serde(default = "default_generic_fallback")]
    pub generic_fallback: String,
}

impl ImagesConfig {
    #[must_use]
    pub fn fallbacks(&self) -> FallbackSources {
        FallbackSources {
            team: self.team_fallback.clone(),
            blog: self.blog_fallback.clone(),
            generic: self.generic_fallback.clone(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            team_fallback: default_team_fallback(),
            blog_fallback: default_blog_fallback(),
            generic_fallback: default_generic_fallback(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Enable mouse support.
    #[serde(default = "default_true")]
    pub mouse: bool,

    /// Timestamp format string (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Dimmed reveal after an image loads, in milliseconds.
    #[serde(default = "default_reveal_millis")]
    pub reveal_millis: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            timestamp_format: default_timestamp_format(),
            reveal_millis: default_reveal_millis(),
        }
    }
}

const fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_categories() -> Vec<String> {
    ["venture-building", "insights", "playbooks", "news"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_contact_form() -> String {
    "contact".to_string()
}

fn default_newsletter_form() -> String {
    "newsletter".to_string()
}

fn default_team_fallback() -> String {
    "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800".to_string()
}

fn default_blog_fallback() -> String {
    "https://images.unsplash.com/photo-1499750310107-5fef28a66643?w=800".to_string()
}

fn default_generic_fallback() -> String {
    "https://images.unsplash.com/photo-1497366216548-37526070297c?w=800".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

const fn default_reveal_millis() -> u64 {
    300
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(data_dir) = &args.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }
        if let Some(secs) = args.autosave_interval {
            self.editor.autosave_interval_secs = secs;
        }
        if args.offline {
            self.offline = true;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default data directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::default_data_dir().map(|dir| dir.join("studio-press.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns effective data directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> Option<PathBuf> {
        self.storage.data_dir.clone().or_else(Self::default_data_dir)
    }

    /// Remote credentials, unless running offline.
    #[must_use]
    pub fn remote_credentials(&self) -> Option<(&str, &str)> {
        if self.offline {
            None
        } else {
            self.remote.credentials()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            offline: false,
            log_level: LogLevel::Info,
            editor: EditorConfig::default(),
            storage: StorageConfig::default(),
            remote: RemoteConfig::default(),
            relay: RelayConfig::default(),
            images: ImagesConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [editor]
            autosave_interval_secs = 10

            [remote]
            url = "https://project.supabase.co"
            api_key = "anon"

            [images]
            team_fallback = "https://cdn.example/team.png"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.editor.autosave_interval(), Duration::from_secs(10));
        assert_eq!(config.editor.default_category(), "venture-building");
        assert_eq!(
            config.remote_credentials(),
            Some(("https://project.supabase.co", "anon"))
        );
        assert_eq!(config.images.fallbacks().team, "https://cdn.example/team.png");
        assert_eq!(config.images.generic_fallback, default_generic_fallback());
        assert_eq!(config.storage.quota_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.editor.autosave_interval_secs, 30);
        assert!(config.remote_credentials().is_none());
        assert!(config.relay.endpoint.is_none());
        assert_eq!(config.ui.reveal_millis, 300);
    }

    #[test]
    fn test_blank_remote_is_unconfigured() {
        let remote = RemoteConfig {
            url: Some("https://project.supabase.co".to_string()),
            api_key: Some("  ".to_string()),
        };
        assert!(remote.credentials().is_none());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [remote]
            url = "https://project.supabase.co"
            api_key = "anon"
            "#,
        )
        .expect("Failed to parse config");

        let args = CliArgs::parse_from([
            "studio-press",
            "--offline",
            "--autosave-interval",
            "5",
            "--log-level",
            "trace",
        ]);
        config.merge_with_args(&args);

        assert!(config.offline);
        assert!(config.remote_credentials().is_none());
        assert_eq!(config.editor.autosave_interval_secs, 5);
        assert_eq!(config.log_level, LogLevel::Trace);
    }
}
