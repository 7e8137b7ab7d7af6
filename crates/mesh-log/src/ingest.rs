use std::path::{Path, PathBuf};

use mesh_proto::telemetry::MeshEvent;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("read event log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A log line that did not decode as an event.
#[derive(Debug, Clone)]
pub struct RejectedLine {
    /// 1-based.
    pub line_no: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub events: Vec<MeshEvent>,
    pub rejected: Vec<RejectedLine>,
}

/// Decode newline-delimited JSON. Blank lines are skipped; malformed lines
/// are collected in `rejected` and never reach the caller's event list.
pub fn parse_events(text: &str) -> Ingested {
    let mut out = Ingested::default();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<MeshEvent>(line) {
            Ok(ev) => out.events.push(ev),
            Err(e) => {
                warn!("ingest: rejecting line {}: {}", i + 1, e);
                out.rejected.push(RejectedLine { line_no: i + 1, error: e.to_string() });
            }
        }
    }
    out
}

/// Read the event log at `path`. `Ok(None)` means there is nothing to read
/// (missing or zero-length file).
pub async fn load_events(path: impl AsRef<Path>) -> Result<Option<Ingested>, IngestError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path).await {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("ingest: {} not found", path.display());
            return Ok(None);
        }
        Err(source) => return Err(IngestError::Read { path: path.to_path_buf(), source }),
    };
    if text.is_empty() {
        info!("ingest: {} is empty", path.display());
        return Ok(None);
    }

    let ingested = parse_events(&text);
    info!(
        "ingest: {} events from {} ({} rejected)",
        ingested.events.len(), path.display(), ingested.rejected.len()
    );
    Ok(Some(ingested))
}
