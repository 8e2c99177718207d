//! Application configuration.

pub mod app_config;
pub mod args;
pub mod loader;

pub use app_config::{
    AppConfig, EditorConfig, ImagesConfig, LogLevel, REMOTE_KEY_ENV, REMOTE_URL_ENV, RelayConfig,
    RemoteConfig, StorageConfig, UiConfig,
};
pub use args::{CliArgs, Command};
pub use loader::{ConfigError, ConfigLoader, ConfigSource, LoadedConfig};
