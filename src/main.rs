// Forest Installation Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/forest-installation-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/forest-installation-simulator --interval 10 --output forest_logs --verbose
// ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use forest_installation_simulator::simulation::{
    DatasetSink, JsonLinesSink, LiveStatsSink, LoggingConfig, NullSink, Scheduler,
};
use forest_installation_simulator::types::{CliArgs, SimulationConfig};
use std::process;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _log_guard = match LoggingConfig::for_verbosity(args.verbose, args.debug).init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args).await {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let dry_run = args.dry_run;

    let config =
        SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    if config.single_snapshot {
        return run_single_snapshot(&config);
    }

    print_startup_banner(&config);

    let sinks = build_sinks(&config)?;
    let mut scheduler = Scheduler::from_config(&config, sinks)
        .context("Failed to initialize the simulation engine")?;

    let stats = scheduler.run_until(shutdown_signal()).await?;

    eprintln!("\n{}", stats.summary());
    info!(session = %stats.session_id, iterations = stats.iterations, "simulation completed");
    Ok(())
}

fn run_single_snapshot(config: &SimulationConfig) -> Result<()> {
    let mut scheduler = Scheduler::from_config(config, NullSink)
        .context("Failed to initialize the simulation engine")?;

    let dataset = scheduler.single_snapshot()?;
    eprintln!("Generated single snapshot at {}", dataset.metadata.simulation_time);
    eprintln!("\n{}", dataset.summary().render());
    Ok(())
}

fn build_sinks(config: &SimulationConfig) -> Result<Vec<Box<dyn DatasetSink>>> {
    let mut sinks: Vec<Box<dyn DatasetSink>> = Vec::new();

    if config.live_display {
        sinks.push(Box::new(LiveStatsSink::stdout()));
    }

    if let Some(path) = &config.jsonl_output {
        let sink = JsonLinesSink::create(path)
            .with_context(|| format!("Failed to open JSON Lines output {}", path))?;
        sinks.push(Box::new(sink));
    }

    Ok(sinks)
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Forest Installation - REAL-TIME MONITORING");
    eprintln!("   Started at: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    eprintln!("   Update interval: {}s", config.interval_seconds);
    if let Some(ticks) = config.max_ticks {
        eprintln!("   Stopping after {} ticks", ticks);
    }
    eprintln!("   Press Ctrl+C to stop");
    eprintln!("{}", "=".repeat(60));
}

fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Interval: {}s", config.interval_seconds);
    eprintln!("  Visitor Flow Multiplier: {:.2}", config.visitor_flow_multiplier);
    eprintln!("  Live Display: {}", config.live_display);
    eprintln!("  Single Snapshot: {}", config.single_snapshot);
    match &config.output {
        Some(output) => eprintln!(
            "  Snapshot Files: {}_backup.json every {} ticks, {}_final.json on exit",
            output, config.snapshot_every, output
        ),
        None => eprintln!("  Snapshot Files: disabled"),
    }
    eprintln!(
        "  History: {} datasets, {} per snapshot",
        config.history_capacity, config.recent_in_snapshot
    );
    if let Some(path) = &config.jsonl_output {
        eprintln!("  JSON Lines Output: {}", path);
    }
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    if let Some(ticks) = config.max_ticks {
        eprintln!("  Tick Limit: {}", ticks);
    }
    if let Some(start) = config.start_time {
        eprintln!("  Start Time: {} (stepped clock)", start.to_rfc3339());
    }
    eprintln!();
}
