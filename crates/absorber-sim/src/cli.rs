use absorber_core::TreatmentKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "absorber-sim")]
#[command(about = "Absorption coefficients of porous, membrane and perforated-panel treatments")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive viewer (default)
    View,

    /// Evaluate a TOML scenario file without the viewer
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Write the per-bin results to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also compute random-incidence absorption
        #[arg(long)]
        diffuse: bool,
    },

    /// Print (or write) a built-in scenario as TOML, as a starting point
    Preset {
        #[arg(value_enum)]
        kind: PresetKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetKind {
    PorousRigid,
    PorousAirGap,
    Membrane,
    Perforated,
    Slotted,
    Microperforated,
}

impl From<PresetKind> for TreatmentKind {
    fn from(kind: PresetKind) -> Self {
        match kind {
            PresetKind::PorousRigid => TreatmentKind::PorousRigid,
            PresetKind::PorousAirGap => TreatmentKind::PorousAirGap,
            PresetKind::Membrane => TreatmentKind::Membrane,
            PresetKind::Perforated => TreatmentKind::Perforated,
            PresetKind::Slotted => TreatmentKind::Slotted,
            PresetKind::Microperforated => TreatmentKind::Microperforated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_viewer() {
        let cli = Cli::try_parse_from(["absorber-sim"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "absorber-sim",
            "-v",
            "run",
            "fibre.toml",
            "--csv",
            "out.csv",
            "--diffuse",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Command::Run {
                scenario,
                csv,
                diffuse,
            }) => {
                assert_eq!(scenario, PathBuf::from("fibre.toml"));
                assert_eq!(csv, Some(PathBuf::from("out.csv")));
                assert!(diffuse);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_preset_kind() {
        let cli = Cli::try_parse_from(["absorber-sim", "preset", "porous-air-gap"]).unwrap();
        match cli.command {
            Some(Command::Preset { kind, output }) => {
                assert_eq!(TreatmentKind::from(kind), TreatmentKind::PorousAirGap);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
