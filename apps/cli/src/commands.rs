use crate::args::Command;
use anyhow::{Context, Result};
use fstore_storage::Storage;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Runs one subcommand, writing its textual output to `out`.
pub(crate) async fn execute<W>(storage: &Storage, command: Command, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    match command {
        Command::Create { name, file } => {
            let data = read_input(&file).await?;
            storage.create(name.as_str(), &data).await?;
            tracing::info!(item = %name, bytes = data.len(), "Created");
        },
        Command::Read { name, output } => {
            let mut item = storage.read(name.as_str()).await?;
            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)
                        .await
                        .with_context(|| format!("Cannot create {}", path.display()))?;
                    tokio::io::copy(&mut item, &mut file).await?;
                    file.flush().await?;
                },
                None => {
                    tokio::io::copy(&mut item, out).await?;
                },
            }
        },
        Command::Update { name, file } => {
            let data = read_input(&file).await?;
            storage.update(name.as_str(), &data).await?;
            tracing::info!(item = %name, bytes = data.len(), "Updated");
        },
        Command::Delete { name } => {
            storage.delete(name.as_str()).await?;
            tracing::info!(item = %name, "Deleted");
        },
        Command::Count => {
            out.write_all(format!("{}\n", storage.count()).as_bytes()).await?;
        },
        Command::Scan { pattern } => {
            let mut names = storage.scan(&pattern).await?;
            names.sort_unstable();
            for name in names {
                out.write_all(name.as_bytes()).await?;
                out.write_all(b"\n").await?;
            }
        },
    }

    out.flush().await?;
    Ok(())
}

async fn read_input(path: &std::path::Path) -> Result<Vec<u8>> {
    fs::read(path).await.with_context(|| format!("Cannot read input file {}", path.display()))
}
