use clap::Parser;
use log::{info, warn};
use massim::config::SimulationConfig;
use massim::error::Result;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "massim", about = "Run the atom simulator headless and log diagnostics")]
struct Cli {
    /// YAML configuration; built-in defaults are used when omitted.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Override the number of steps to run.
    #[arg(short = 'n', long = "steps")]
    steps: Option<u64>,

    /// Override the RNG seed.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Override the initial temperature (K).
    #[arg(short = 't', long = "temperature")]
    temperature: Option<f64>,
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            SimulationConfig::from_path(path)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(steps) = cli.steps {
        cfg.run.steps = steps;
    }
    if cli.seed.is_some() {
        cfg.space.seed = cli.seed;
    }
    if let Some(t) = cli.temperature {
        cfg.space.temperature = t;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let mut space = cfg.build_space()?;
    info!(
        "{} atoms in {}x{} at T={} K, thermal speed {:.4}/tick",
        space.num_particles(),
        cfg.space.width,
        cfg.space.height,
        space.temperature(),
        space.thermal_speed(cfg.atoms.species.mass)
    );
    if space.thermal_speed(cfg.atoms.species.mass) == 0.0 {
        warn!("temperature is at or below the freezing point; atoms will not move");
    }

    for step in 1..=cfg.run.steps {
        space.step();
        if step % cfg.run.report_every == 0 || step == cfg.run.steps {
            let [px, py] = space.total_momentum();
            info!(
                "step {step}: mean speed {:.4}, kinetic energy {:.4}, |momentum| {:.4}",
                space.mean_speed(),
                space.kinetic_energy(),
                px.hypot(py)
            );
        }
    }

    info!("Done after {} steps", space.steps());
    Ok(())
}
