//! Configuration for fstore applications.
//!
//! Settings come from a file (`fstore.toml` by default) overlaid with `FSTORE__`
//! environment variables.
//!
//! ```rust,no_run
//! use fstore_config::{AppConfig, load_config};
//!
//! let cfg: AppConfig = load_config(None::<&str>).unwrap_or_default();
//! println!("storing items under {}", cfg.storage.root_path.display());
//! ```

mod loader;
mod settings;

pub use loader::{ConfigError, ConfigErrorExt, DEFAULT_CONFIG_FILE, ENV_PREFIX, load_config};
pub use settings::{AppConfig, LogSettings, StorageSettings};
