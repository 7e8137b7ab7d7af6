pub mod receipt;
pub mod telemetry;
