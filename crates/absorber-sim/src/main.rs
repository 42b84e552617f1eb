mod cli;
mod export;
mod logger;

use absorber_core::{Scenario, TreatmentParams};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, PresetKind};
use std::path::{Path, PathBuf};

/// Octave-band centres reported after a headless run.
const OCTAVE_BANDS: [f64; 6] = [125.0, 250.0, 500.0, 1_000.0, 2_000.0, 4_000.0];

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match cli.command.unwrap_or(Command::View) {
        Command::View => {
            tracing::info!("starting viewer");
            absorber_render::run().map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
        }
        Command::Run {
            scenario,
            csv,
            diffuse,
        } => run_scenario(&scenario, csv.as_deref(), diffuse),
        Command::Preset { kind, output } => write_preset(kind, output),
    }
}

fn run_scenario(path: &Path, csv_path: Option<&Path>, with_diffuse: bool) -> Result<()> {
    let scenario = Scenario::from_path(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let curve = scenario
        .evaluate()
        .with_context(|| format!("failed to evaluate scenario '{}'", scenario.name))?;

    let diffuse = if with_diffuse {
        Some(curve.diffuse_absorption(&scenario.air()?))
    } else {
        None
    };

    match curve.peak() {
        Some((f, alpha)) => tracing::info!(frequency = f, alpha, "peak absorption"),
        None => tracing::warn!("no finite absorption values in the sweep"),
    }

    println!("{} ({:.0} mm total)", scenario.name, scenario.total_depth() * 1000.0);
    println!("{:>8}  {:>6}", "Hz", "alpha");
    for band in OCTAVE_BANDS {
        if let Some(alpha) = curve.absorption_at(band) {
            println!("{band:>8.0}  {alpha:>6.3}");
        }
    }

    if let Some(csv_path) = csv_path {
        export::write_curve_csv(csv_path, &curve, diffuse.as_deref())?;
    }
    Ok(())
}

fn write_preset(kind: PresetKind, output: Option<PathBuf>) -> Result<()> {
    let text = TreatmentParams::preset(kind.into()).scenario().to_toml_string()?;
    match output {
        Some(path) => {
            std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote preset scenario");
        }
        None => print!("{text}"),
    }
    Ok(())
}
