use bacsim_device::{Simulator, SimulatorConfig, SourceConfig};
use bacsim_tools::{serve_json_lines, SourceArg};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "bacsim-simulator")]
struct Args {
    /// TOML configuration. The built-in nine-point transmitter is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for initial values and synthetic drift.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the configured value source.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,
    /// Feed snapshot file, used with `--source feed`.
    #[arg(long)]
    feed_path: Option<PathBuf>,
    /// Answer writes to read-only targets with write-access-denied.
    #[arg(long)]
    strict_writes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(source) = args.source {
        source.apply(&mut config, args.feed_path.clone());
    }
    if let (Some(value), SourceConfig::Synthetic { seed, .. }) = (args.seed, &mut config.source) {
        *seed = Some(value);
    }
    if args.strict_writes {
        config.dispatch.reject_unsupported_writes = true;
    }

    let sim = Simulator::from_config(&config)?;
    let scheduler = sim.start();
    log::info!(
        "device {} serving JSON lines on stdin/stdout; Ctrl+C to stop",
        sim.catalogue().device_id()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    tokio::select! {
        stats = serve_json_lines(sim.dispatcher(), stdin, stdout) => {
            let stats = stats?;
            log::info!(
                "input closed after {} requests ({} answered, {} malformed)",
                stats.requests,
                stats.responses,
                stats.malformed
            );
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupted");
        }
    }

    let ticks = scheduler.stop().await;
    log::info!("value source ran {ticks} ticks");
    Ok(())
}
