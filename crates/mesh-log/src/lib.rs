pub mod ingest;
pub mod sink;
pub mod synthetic;

pub use ingest::{load_events, parse_events, IngestError, Ingested, RejectedLine};
pub use sink::write_receipt;
