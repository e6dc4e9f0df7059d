use serde::Deserialize;
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageSettings,
    pub logging: LogSettings,
}

/// Storage engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory owning all items; created with its ancestors if missing.
    pub root_path: PathBuf,
    /// Maximum shard directory depth. Must be at least 1.
    pub imbrication_level: usize,
    pub create: bool,
    /// Serialize same-name mutations instead of letting them race.
    pub serialize_writes: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("./storage"),
            imbrication_level: 3,
            create: true,
            serialize_writes: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default level directive (`trace`..`error`), overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for rolling log files; console only when unset.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), path: None, json: false, console: true }
    }
}
