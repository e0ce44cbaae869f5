use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use citygrid::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "citygrid simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/starter_town.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print one JSON tick report per line instead of a summary line
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let state = scenario.build_state()?;
    let ticks = scenario.ticks(cli.ticks);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
    };
    let mut engine = EngineBuilder::new(settings).with_state(state).build();

    let mut output = Ok(());
    engine.run_with_hook(ticks, |report| {
        if output.is_err() {
            return;
        }
        if cli.json {
            output = serde_json::to_string(report).map(|line| println!("{line}"));
        } else {
            println!(
                "tick {:>4}  pop {:>5}  jobs {:>5}  money {:>7}  R {:>6.1} C {:>6.1} I {:>6.1}  events {}",
                report.tick,
                report.population,
                report.jobs,
                report.money,
                report.demand.residential,
                report.demand.commercial,
                report.demand.industrial,
                report.events.len()
            );
        }
    });
    output?;

    let summary = engine.state().snapshot();
    println!(
        "Scenario '{}' completed for {} ticks. Population: {}, jobs: {}, money: {}, denizens: {} active / {} departed",
        scenario.name,
        ticks,
        summary.population,
        summary.jobs,
        summary.money,
        summary.active_denizens,
        summary.departed_denizens
    );
    Ok(())
}
