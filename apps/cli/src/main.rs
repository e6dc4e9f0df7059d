mod args;
mod commands;

use crate::args::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use fstore_config::{AppConfig, load_config};
use fstore_logger::Logger;
use fstore_storage::Storage;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg: AppConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(root) = cli.root {
        cfg.storage.root_path = root;
    }
    if let Some(level) = cli.imbrication_level {
        cfg.storage.imbrication_level = level;
    }

    let _log = Logger::from_settings(env!("CARGO_BIN_NAME"), &cfg.logging)?;

    let storage = Storage::builder()
        .root(&cfg.storage.root_path)
        .imbrication_level(cfg.storage.imbrication_level)
        .create(cfg.storage.create)
        .serialize_writes(cfg.storage.serialize_writes)
        .connect()
        .await
        .with_context(|| format!("Cannot open storage at {}", cfg.storage.root_path.display()))?;

    let mut stdout = tokio::io::stdout();
    commands::execute(&storage, cli.command, &mut stdout).await
}
