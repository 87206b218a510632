//! HomePulse simulation driver CLI
//!
//! Runs the engine under a seeded virtual environment and reports the
//! hazard activity it produces.

use clap::Parser;
use homepulse_core::{
    EngineConfig, NotificationSink, NotifyConfig, NtfySink, OverridePatch, SimulationEngine,
    SimulationMode, TickRequest,
};
use homepulse_env::PulseContext;
use homepulse_sim::{LogSink, SimContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// HomePulse deterministic driver
#[derive(Parser, Debug)]
#[command(name = "homepulse-sim")]
#[command(about = "Run the HomePulse engine in a seeded virtual environment", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of ticks to run
    #[arg(short, long, default_value = "60")]
    ticks: u64,

    /// Virtual time advanced between ticks, in milliseconds
    #[arg(short, long, default_value = "2000")]
    interval_ms: u64,

    /// Manual override patch applied on the first tick,
    /// e.g. "temperature=40,gas=250"
    #[arg(short, long)]
    manual: Option<String>,

    /// Push topic; when set, alerts POST to the real push endpoint
    #[arg(long)]
    topic: Option<String>,

    /// Print the final state snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Parses a "key=value,key=value" override spec and validates it the way the
/// request boundary would.
fn parse_patch(spec: &str) -> Result<OverridePatch, String> {
    let mut patch = OverridePatch::default();

    for pair in spec.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
        let value = value.trim();
        match key.trim() {
            "temperature" => {
                patch.temperature = Some(value.parse().map_err(|e| format!("temperature: {e}"))?);
            }
            "motion" => {
                patch.motion = Some(value.parse().map_err(|e| format!("motion: {e}"))?);
            }
            "light" => {
                patch.light = Some(value.parse().map_err(|e| format!("light: {e}"))?);
            }
            "gas" => {
                patch.gas = Some(value.parse().map_err(|e| format!("gas: {e}"))?);
            }
            other => return Err(format!("unknown override field '{other}'")),
        }
    }

    patch.validate().map_err(|e| e.to_string())?;
    Ok(patch)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Determine seed
    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos() as u64
    } else {
        args.seed
    };

    // Boundary validation of the override spec
    let patch = match args.manual.as_deref().map(parse_patch) {
        Some(Ok(patch)) => Some(patch),
        Some(Err(e)) => {
            eprintln!("Invalid --manual spec: {e}");
            std::process::exit(1);
        }
        None => None,
    };

    let sink: Arc<dyn NotificationSink> = match &args.topic {
        Some(topic) => {
            let config = NotifyConfig {
                topic: topic.clone(),
                ..Default::default()
            };
            match NtfySink::new(config) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    eprintln!("Failed to build push client: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Arc::new(LogSink),
    };

    let ctx = SimContext::shared(seed);
    let engine = SimulationEngine::new(ctx.clone(), sink, EngineConfig::default());
    let interval = Duration::from_millis(args.interval_ms);

    info!(seed, ticks = args.ticks, "HomePulse simulation starting");

    let mut total_alerts = 0usize;
    let mut last = None;

    for tick in 0..args.ticks {
        let request = if tick == 0 && patch.is_some() {
            TickRequest {
                mode: Some(SimulationMode::Manual),
                overrides: patch,
            }
        } else {
            TickRequest::drift()
        };

        let snapshot = engine.tick(request).await;
        total_alerts += snapshot.sensor_data.current_warnings.len();

        if args.verbose || !snapshot.sensor_data.current_warnings.is_empty() {
            debug!(
                tick,
                temperature = snapshot.sensor_data.temperature,
                light = snapshot.sensor_data.light,
                gas = snapshot.sensor_data.gas,
                warnings = snapshot.sensor_data.current_warnings.len(),
                "tick complete"
            );
            for warning in &snapshot.sensor_data.current_warnings {
                info!(tick, %warning, "hazard fired");
            }
        }

        last = Some(snapshot);
        ctx.sleep(interval).await;
    }

    let Some(snapshot) = last else {
        info!("nothing to do (0 ticks)");
        return;
    };

    info!(
        ticks = args.ticks,
        total_alerts,
        history_len = snapshot.history.len(),
        "simulation finished"
    );

    if args.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                eprintln!("Failed to serialize snapshot: {e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patch_full() {
        let patch = parse_patch("temperature=40, gas=250").unwrap();
        assert_eq!(patch.temperature, Some(40.0));
        assert_eq!(patch.gas, Some(250.0));
        assert_eq!(patch.light, None);
    }

    #[test]
    fn test_parse_patch_rejects_unknown_field() {
        assert!(parse_patch("humidity=55").is_err());
    }

    #[test]
    fn test_parse_patch_rejects_out_of_range() {
        assert!(parse_patch("light=5000").is_err());
        assert!(parse_patch("motion=3").is_err());
    }

    #[test]
    fn test_parse_patch_rejects_garbage() {
        assert!(parse_patch("temperature").is_err());
        assert!(parse_patch("temperature=warm").is_err());
    }
}
