//! dvsim binary
//!
//! Run a distance-vector scenario and print its routing tables over time.

use std::env;

use dvsim_convergence::check_history;
use dvsim_vis::{
    render_json, render_outcome, render_report, render_snapshot, Error, OutputFormat, Playback,
    PlaybackStatus, Scenario, SimConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    println!("Usage: dvsim [SCENARIO.json] [OPTIONS]");
    println!();
    println!("Without a scenario file the built-in X/Y/Z triangle is simulated.");
    println!();
    println!("Options:");
    println!("  --max-rounds N     Round cap (default: scenario value, then 10)");
    println!("  --format text|json Output format (default: text)");
    println!("  --iteration N      Show only snapshot N");
    println!("  --verify           Check history invariants before printing");
    println!("  --help             Show this message");
    println!();
    println!("Environment: DVSIM_SCENARIO, DVSIM_MAX_ROUNDS, DVSIM_FORMAT, RUST_LOG");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dvsim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let config = SimConfig::from_env()?.apply_args(args)?;

    let scenario = match &config.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::reference_triangle(),
    };
    let history = scenario.run(scenario.engine_config(config.max_rounds))?;

    if config.verify {
        check_history(&history).map_err(Error::from)?;
        tracing::info!(snapshots = history.len(), "history verified");
    }

    match config.iteration {
        Some(iteration) => {
            if iteration >= history.len() {
                return Err(Error::IterationOutOfRange {
                    requested: iteration,
                    available: history.len(),
                }
                .into());
            }

            let mut playback = Playback::new(&history);
            playback.seek(iteration);

            match config.format {
                OutputFormat::Text => {
                    println!("{}", render_snapshot(&history, playback.current()));
                    println!();
                    println!("{}", render_outcome(history.outcome()));
                }
                OutputFormat::Json => {
                    let status = PlaybackStatus::from(&playback);
                    let body = serde_json::json!({
                        "playback": status,
                        "snapshot": playback.current(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
            }
        }
        None => match config.format {
            OutputFormat::Text => println!("{}", render_report(&scenario, &history)),
            OutputFormat::Json => println!("{}", render_json(&history)?),
        },
    }

    Ok(())
}
