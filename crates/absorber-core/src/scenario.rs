//! TOML scenario files.
//!
//! A scenario names the ambient air, the frequency sweep and the treatment
//! as a list of layers from the exposed face towards the rigid wall:
//!
//! ```toml
//! name = "25 mm fibre, 75 mm cavity"
//!
//! [air]
//! rho0 = 1.21
//! c0 = 343.0
//!
//! [frequency]
//! start = 100.0
//! stop = 10000.0
//! step = 1.0
//!
//! [[layers]]
//! type = "porous"
//! depth = 0.025
//! material = { model = "delany-bazley", sigma = 10000.0 }
//!
//! [[layers]]
//! type = "air-gap"
//! depth = 0.075
//! ```

use crate::constants::{AirProperties, Thermodynamics};
use crate::error::{AbsorberError, Result};
use crate::frequency::FrequencyVector;
use crate::layers::{AirGap, LayerStack, PorousLayer};
use crate::panel::Panel;
use crate::porous::Material;
use crate::response::{sweep, AbsorptionCurve};
use crate::AcousticLayer;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub air: AirConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermodynamics: Option<Thermodynamics>,
    pub frequency: FrequencyConfig,
    pub layers: Vec<LayerConfig>,
}

/// Either explicit `rho0`/`c0`, or a temperature in °C. Empty means the
/// standard 1.21 kg/m³, 343 m/s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyConfig {
    pub start: f64,
    pub stop: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayerConfig {
    Porous { depth: f64, material: Material },
    AirGap { depth: f64 },
    Panel { panel: Panel },
}

impl LayerConfig {
    pub fn depth(&self) -> f64 {
        match self {
            LayerConfig::Porous { depth, .. } | LayerConfig::AirGap { depth } => *depth,
            LayerConfig::Panel { panel } => panel.thickness(),
        }
    }

    fn build(&self) -> Box<dyn AcousticLayer> {
        match self {
            LayerConfig::Porous { depth, material } => Box::new(PorousLayer::new(*material, *depth)),
            LayerConfig::AirGap { depth } => Box::new(AirGap::new(*depth)),
            LayerConfig::Panel { panel } => Box::new(*panel),
        }
    }
}

fn config_error(message: impl Into<String>) -> AbsorberError {
    AbsorberError::Config {
        message: message.into(),
    }
}

impl AirConfig {
    pub fn resolve(&self) -> Result<AirProperties> {
        match (self.rho0, self.c0, self.temperature) {
            (None, None, None) => Ok(AirProperties::standard()),
            (Some(rho0), Some(c0), None) => AirProperties::new(rho0, c0),
            (None, None, Some(t)) => AirProperties::from_temperature(t),
            _ => Err(config_error(
                "[air] takes either both `rho0` and `c0`, or `temperature` alone",
            )),
        }
    }
}

impl FrequencyConfig {
    pub fn resolve(&self) -> Result<FrequencyVector> {
        match (self.step, self.points) {
            (Some(step), None) => FrequencyVector::stepped(self.start, self.stop, step),
            (None, Some(points)) => FrequencyVector::linspace(self.start, self.stop, points),
            _ => Err(config_error("[frequency] takes exactly one of `step` or `points`")),
        }
    }
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(source).map_err(|e| config_error(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded scenario file");
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| config_error(e.to_string()))
    }

    /// Resolve every section and validate every layer.
    pub fn validate(&self) -> Result<()> {
        self.air()?;
        self.thermo().validate()?;
        self.frequencies()?;
        if self.layers.is_empty() {
            return Err(config_error("scenario needs at least one layer"));
        }
        self.stack().validate()
    }

    pub fn air(&self) -> Result<AirProperties> {
        self.air.resolve()
    }

    pub fn thermo(&self) -> Thermodynamics {
        self.thermodynamics.unwrap_or_default()
    }

    pub fn frequencies(&self) -> Result<FrequencyVector> {
        self.frequency.resolve()
    }

    pub fn stack(&self) -> LayerStack {
        LayerStack::new(self.layers.iter().map(LayerConfig::build).collect())
    }

    pub fn total_depth(&self) -> f64 {
        self.layers.iter().map(LayerConfig::depth).sum()
    }

    pub fn evaluate(&self) -> Result<AbsorptionCurve> {
        let air = self.air()?;
        let frequencies = self.frequencies()?;
        tracing::info!(
            scenario = %self.name,
            layers = self.layers.len(),
            bins = frequencies.len(),
            "evaluating scenario"
        );
        sweep(&self.stack(), &frequencies, &air, &self.thermo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::porous::{DelanyBazley, Jca};

    const AIR_GAP: &str = r#"
name = "25 mm fibre, 75 mm cavity"

[air]
rho0 = 1.21
c0 = 343.0

[frequency]
start = 100.0
stop = 4000.0
step = 10.0

[[layers]]
type = "porous"
depth = 0.025
material = { model = "delany-bazley", sigma = 10000.0 }

[[layers]]
type = "air-gap"
depth = 0.075
"#;

    #[test]
    fn test_parse_air_gap_scenario() {
        let scenario = Scenario::from_toml_str(AIR_GAP).unwrap();
        assert_eq!(scenario.layers.len(), 2);
        assert_eq!(
            scenario.layers[0],
            LayerConfig::Porous {
                depth: 0.025,
                material: Material::DelanyBazley(DelanyBazley { sigma: 10_000.0 }),
            }
        );
        assert!((scenario.total_depth() - 0.1).abs() < 1e-12);
        assert_eq!(scenario.frequencies().unwrap().len(), 391);

        let curve = scenario.evaluate().unwrap();
        assert_eq!(curve.len(), 391);
    }

    #[test]
    fn test_parse_panel_and_jca_layers() {
        let source = r#"
name = "perforated over glass wool"

[air]
temperature = 20.0

[frequency]
start = 50.0
stop = 2000.0
points = 128

[[layers]]
type = "panel"
panel = { kind = "perforated", hole_diameter = 0.005, hole_spacing = 0.02, thickness = 0.003 }

[[layers]]
type = "porous"
depth = 0.05
material = { model = "jca", sigma = 20000.0, porosity = 0.98, tortuosity = 1.02, viscous_length = 0.0001, thermal_length = 0.0002 }
"#;
        let scenario = Scenario::from_toml_str(source).unwrap();
        assert!(matches!(scenario.layers[0], LayerConfig::Panel { panel: Panel::Perforated { .. } }));
        assert!(matches!(
            scenario.layers[1],
            LayerConfig::Porous {
                material: Material::Jca(Jca { .. }),
                ..
            }
        ));
        let air = scenario.air().unwrap();
        assert!((air.c0 - 343.2).abs() < 0.5);
        assert_eq!(scenario.evaluate().unwrap().len(), 128);
    }

    #[test]
    fn test_membrane_resistance_defaults_to_zero() {
        let source = r#"
name = "membrane"
[frequency]
start = 50.0
stop = 500.0
step = 5.0
[[layers]]
type = "panel"
panel = { kind = "membrane", surface_density = 1.0 }
[[layers]]
type = "air-gap"
depth = 0.1
"#;
        let scenario = Scenario::from_toml_str(source).unwrap();
        assert_eq!(
            scenario.layers[0],
            LayerConfig::Panel {
                panel: Panel::Membrane {
                    surface_density: 1.0,
                    resistance: 0.0
                }
            }
        );
        assert_eq!(scenario.air().unwrap(), AirProperties::standard());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let negative_sigma = AIR_GAP.replace("sigma = 10000.0", "sigma = -5.0");
        let err = Scenario::from_toml_str(&negative_sigma).unwrap_err();
        assert!(matches!(err, AbsorberError::InvalidParameter { name: "sigma", .. }), "{err:?}");

        let both = AIR_GAP.replace("step = 10.0", "step = 10.0\npoints = 12");
        assert!(matches!(
            Scenario::from_toml_str(&both).unwrap_err(),
            AbsorberError::Config { .. }
        ));

        let mixed_air = AIR_GAP.replace("c0 = 343.0", "temperature = 20.0");
        assert!(Scenario::from_toml_str(&mixed_air).is_err());
    }

    #[test]
    fn test_degenerate_point_counts_rejected() {
        let zero = AIR_GAP.replace("step = 10.0", "points = 0");
        let err = Scenario::from_toml_str(&zero).unwrap_err();
        assert!(matches!(err, AbsorberError::InvalidParameter { name: "points", .. }), "{err:?}");

        let single = AIR_GAP.replace("step = 10.0", "points = 1");
        assert!(Scenario::from_toml_str(&single).is_err());

        let tiny_step = AIR_GAP.replace("step = 10.0", "step = 1e-300");
        let err = Scenario::from_toml_str(&tiny_step).unwrap_err();
        assert!(matches!(err, AbsorberError::InvalidParameter { name: "step", .. }), "{err:?}");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Scenario::from_toml_str("name = \n").unwrap_err();
        assert!(matches!(err, AbsorberError::Config { .. }), "{err:?}");
        let unknown = AIR_GAP.replace("type = \"air-gap\"", "type = \"curtain\"");
        assert!(Scenario::from_toml_str(&unknown).is_err());
    }

    #[test]
    fn test_bundled_scenarios_parse() {
        for source in [
            include_str!("../../../scenarios/fibre_on_wall.toml"),
            include_str!("../../../scenarios/perforated_over_cavity.toml"),
            include_str!("../../../scenarios/microperforated.toml"),
        ] {
            let scenario = Scenario::from_toml_str(source).unwrap();
            assert!(!scenario.layers.is_empty(), "{}", scenario.name);
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let scenario = Scenario::from_toml_str(AIR_GAP).unwrap();
        let text = scenario.to_toml_string().unwrap();
        assert_eq!(Scenario::from_toml_str(&text).unwrap(), scenario);
    }
}
