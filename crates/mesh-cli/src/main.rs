use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mesh_health::{doctor as health_doctor, evaluate, HealthConfig};
use mesh_log::synthetic;
use mesh_proto::receipt::Thresholds;
use mesh_proto::telemetry::RadioConfig;

#[derive(Debug, Parser)]
#[command(name = "mesh", version, about = "meshline - mesh health receipts from radio telemetry")]
struct Cli {
    /// TOML config; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reduce the event log and write a health receipt.
    Receipt {
        #[arg(long)]
        events: Option<String>,
        #[arg(long)]
        out: Option<String>,
        /// Evaluate as of this Unix time instead of the wall clock.
        #[arg(long)]
        now: Option<i64>,
        /// Seed for the synthetic sample used when the log is missing.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a synthetic event log.
    Simulate {
        #[arg(long)]
        out: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    Doctor,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Config {
    window: WindowCfg,
    threshold: Thresholds,
    radio: RadioConfig,
    paths: PathsCfg,
    synthetic: SyntheticCfg,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct WindowCfg {
    window_sec: u64,
}

impl Default for WindowCfg {
    fn default() -> Self {
        Self { window_sec: 600 }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct PathsCfg {
    events: String,
    receipt: String,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            events: "logs/events.jsonl".to_string(),
            receipt: "docs/receipt.latest.json".to_string(),
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SyntheticCfg {
    seed: Option<u64>,
}

impl Config {
    fn health(&self) -> HealthConfig {
        HealthConfig {
            window_sec: self.window.window_sec,
            threshold: self.threshold,
            radio_seed: self.radio,
        }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let Some(path) = path else { return Ok(Config::default()); };
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    parse_config(&s)
}

fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Receipt { events, out, now, seed } => receipt(&cfg, events, out, now, seed).await?,
        Command::Simulate { out, seed } => simulate(&cfg, out, seed).await?,
        Command::Doctor => doctor(&cfg)?,
    }
    Ok(())
}

fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

async fn receipt(
    cfg: &Config,
    events: Option<String>,
    out: Option<String>,
    now: Option<i64>,
    seed: Option<u64>,
) -> Result<()> {
    let health = cfg.health();
    health_doctor::check_config(&health).context("config check")?;

    let events_path = events.unwrap_or_else(|| cfg.paths.events.clone());
    let out_path = out.unwrap_or_else(|| cfg.paths.receipt.clone());
    let now = now.unwrap_or_else(unix_now);

    let evs = match mesh_log::load_events(&events_path).await? {
        Some(ingested) if !ingested.events.is_empty() => ingested.events,
        Some(ingested) => {
            warn!("receipt: {} had no usable events ({} rejected)", events_path, ingested.rejected.len());
            Vec::new()
        }
        None => {
            let seed = seed.or(cfg.synthetic.seed);
            info!("receipt: no event log at {}, using synthetic sample (seed={:?})", events_path, seed);
            synthetic::synthesize(now, &mut synthetic::rng(seed))
        }
    };

    let eval = evaluate(&evs, now, &health);
    mesh_log::write_receipt(&out_path, &eval.receipt).await?;

    println!("[ok] wrote {}", out_path);
    println!("{}", eval.summary_line());
    Ok(())
}

async fn simulate(cfg: &Config, out: Option<String>, seed: Option<u64>) -> Result<()> {
    let out_path = out.unwrap_or_else(|| cfg.paths.events.clone());
    let seed = seed.or(cfg.synthetic.seed);
    let evs = synthetic::synthesize(unix_now(), &mut synthetic::rng(seed));
    synthetic::write_jsonl(&out_path, &evs).await?;
    println!("[ok] wrote {} events to {}", evs.len(), out_path);
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");
    health_doctor::check_config(&cfg.health())?;
    if !std::path::Path::new(&cfg.paths.events).exists() {
        warn!("doctor: event log {} missing; receipts will use a synthetic sample", cfg.paths.events);
    }
    info!("doctor: OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_config_parses_and_passes_doctor() {
        let cfg = parse_config(include_str!("../../../mesh.example.toml")).unwrap();
        let health = cfg.health();
        assert_eq!(health, HealthConfig::default());
        assert_eq!(cfg.paths.events, "logs/events.jsonl");
        assert_eq!(cfg.synthetic.seed, None);
        health_doctor::check_config(&health).unwrap();
    }

    #[test]
    fn partial_tables_override_only_named_keys() {
        let cfg = parse_config(
            r#"
[threshold]
p95_ms = 1500

[radio]
wifi_direct = true
"#,
        )
        .unwrap();
        let health = cfg.health();
        assert_eq!(health.threshold, Thresholds { delivery: 0.95, p95_ms: 1500, ttl_max: 4 });
        assert_eq!(health.radio_seed, RadioConfig { wifi_direct: true, ..RadioConfig::default() });
        assert_eq!(health.window_sec, 600);
        assert_eq!(cfg.paths.receipt, "docs/receipt.latest.json");
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.health(), HealthConfig::default());
        assert!(load_config(Some("/nonexistent/mesh.toml")).is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = parse_config("[threshold]\ndelivery = \"high\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("parse config toml"));
    }
}
