use std::path::Path;

use anyhow::{Context, Result};
use mesh_proto::receipt::Receipt;
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;

/// Persist the receipt as pretty-printed JSON, replacing any previous one.
pub async fn write_receipt(path: impl AsRef<Path>, receipt: &Receipt) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await.with_context(|| format!("create {}", dir.display()))?;
    }
    let body = serde_json::to_vec_pretty(receipt).context("encode receipt")?;
    let mut f = fs::File::create(path).await.with_context(|| format!("create {}", path.display()))?;
    f.write_all(&body).await?;
    f.flush().await?;
    info!("sink: wrote receipt ({} bytes) to {}", body.len(), path.display());
    Ok(())
}
