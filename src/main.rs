//! Coin Gas entry point
//!
//! Builds a world from a preset or JSON config and runs it with the console
//! reporter attached.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use coin_gas::sim::{Pacing, SimulationLoop};
use coin_gas::{ConsoleReporter, Error, ExchangeRule, Preset, Result, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "coin-gas", about = "Hard disks trading coins until they reach equilibrium")]
struct Cli {
    /// Starting setup: classic, large or pooled
    #[arg(short, long, default_value = "classic")]
    preset: String,

    /// JSON config file (overrides the preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Coin exchange rule: bernoulli or uniform
    #[arg(short, long)]
    exchange: Option<String>,

    /// Number of ticks to simulate (0 = until killed)
    #[arg(short, long, default_value = "3600")]
    ticks: u64,

    /// Print the running averages every N collisions
    #[arg(long)]
    report_every: Option<u64>,

    /// Pace ticks at the configured fps instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Print the final statistics snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Keep the running-average series and include it in the JSON output
    #[arg(long)]
    series: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let preset = Preset::from_str(&cli.preset)
                .ok_or_else(|| Error::InvalidConfig(format!("unknown preset {:?}", cli.preset)))?;
            log::info!("Using preset {}", preset.as_str());
            SimConfig::from_preset(preset)
        }
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(name) = &cli.exchange {
        config.exchange = ExchangeRule::from_str(name)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown exchange rule {name:?}")))?;
    }
    if let Some(every) = cli.report_every {
        config.report_every = every;
    }
    if cli.series {
        config.record_series = true;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut sim = SimulationLoop::new(&config)?;
    sim.add_presenter(Box::new(ConsoleReporter::new(config.report_every)));

    let ticks = (cli.ticks > 0).then_some(cli.ticks);
    let pacing = if cli.realtime {
        Pacing::RealTime
    } else {
        Pacing::Unpaced
    };
    let summary = sim.run(ticks, pacing)?;

    let world = sim.world();
    let coins: Vec<String> = world.disks().iter().map(|d| d.coins().to_string()).collect();
    println!(
        "\n{} ticks, {} collisions, {} exchange, seed {}, coins [{}] (total {})",
        summary.ticks,
        summary.collisions,
        world.rule().as_str(),
        world.seed(),
        coins.join(", "),
        world.coin_sum()
    );

    if cli.json {
        let stats = sim.stats();
        let output = if config.record_series {
            serde_json::json!({ "snapshot": stats.snapshot(), "series": stats.series() })
        } else {
            serde_json::to_value(stats.snapshot())?
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coin Gas starting...");

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
