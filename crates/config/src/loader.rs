use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Base name of the configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fstore";

/// Prefix of environment overrides, e.g. `FSTORE__STORAGE__ROOT_PATH`.
pub const ENV_PREFIX: &str = "FSTORE";

/// Custom error type for config loading.
#[fstore_derive::fstore_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a configuration file layered under environment overrides.
///
/// 1. **Base File**: `path`, or [`DEFAULT_CONFIG_FILE`] in the working directory. The
///    format is picked from the extension; without one, every supported extension is tried.
///    An explicit `path` must exist; the default file is optional.
/// 2. **Environment Overrides**: variables prefixed with `FSTORE__`, nested with double
///    underscores (`FSTORE__STORAGE__IMBRICATION_LEVEL=4` sets `storage.imbrication_level`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file cannot be found, if any file
/// cannot be parsed, or if the
/// merged values do not deserialize into `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading configuration");

    builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
