pub mod absorption;
pub mod constants;
pub mod error;
pub mod frequency;
pub mod impedance;
pub mod layers;
pub mod panel;
pub mod porous;
pub mod response;
pub mod scenario;
pub mod transfer_matrix;

pub use constants::{AirProperties, Thermodynamics};
pub use error::{AbsorberError, Result};
pub use frequency::FrequencyVector;
pub use layers::LayerStack;
pub use panel::Panel;
pub use porous::{DelanyBazley, Jca, Material, Miki};
pub use response::AbsorptionCurve;
pub use scenario::{AirConfig, FrequencyConfig, LayerConfig, Scenario};

use transfer_matrix::TransferMatrix;

// ---------------------------------------------------------------------------
// Shared interface types — the viewer and the CLI both build against these
// ---------------------------------------------------------------------------

/// Trait for layers of a treatment that can produce a 2×2 transfer matrix
/// at a given angular frequency.
pub trait AcousticLayer: Send + Sync {
    /// Compute the 2×2 transfer matrix at angular frequency `omega` (rad/s).
    fn transfer_matrix(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> TransferMatrix;

    /// Reject geometry or material parameters outside their domain.
    fn validate(&self) -> Result<()>;

    /// Emit advisories for frequencies outside an empirical model's range.
    fn check_range(&self, _frequencies: &[f64], _air: &AirProperties) {}

    /// Thickness the layer occupies in front of the wall, in metres.
    fn depth(&self) -> f64;
}

/// The families of treatment covered by the interactive viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentKind {
    PorousRigid,
    PorousAirGap,
    Membrane,
    Perforated,
    Slotted,
    Microperforated,
}

impl TreatmentKind {
    pub const ALL: [TreatmentKind; 6] = [
        TreatmentKind::PorousRigid,
        TreatmentKind::PorousAirGap,
        TreatmentKind::Membrane,
        TreatmentKind::Perforated,
        TreatmentKind::Slotted,
        TreatmentKind::Microperforated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TreatmentKind::PorousRigid => "Porous on rigid wall",
            TreatmentKind::PorousAirGap => "Porous with air gap",
            TreatmentKind::Membrane => "Membrane absorber",
            TreatmentKind::Perforated => "Perforated panel",
            TreatmentKind::Slotted => "Slotted panel",
            TreatmentKind::Microperforated => "Microperforated panel",
        }
    }

    pub fn has_panel(&self) -> bool {
        !matches!(self, TreatmentKind::PorousRigid | TreatmentKind::PorousAirGap)
    }
}

/// Which porous model fills the porous layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PorousModelKind {
    DelanyBazley,
    Miki,
    Jca,
}

/// Flat parameter set edited by the viewer. Converted to a [`Scenario`]
/// before evaluation.
#[derive(Debug, Clone)]
pub struct TreatmentParams {
    pub kind: TreatmentKind,
    pub porous_model: PorousModelKind,
    /// Flow resistivity in N·s/m⁴.
    pub sigma: f64,
    /// JCA open porosity.
    pub porosity: f64,
    /// JCA tortuosity.
    pub tortuosity: f64,
    /// JCA viscous characteristic length in metres.
    pub viscous_length: f64,
    /// JCA thermal characteristic length in metres.
    pub thermal_length: f64,
    /// Porous layer thickness in metres.
    pub porous_depth: f64,
    /// Air cavity depth in metres (behind the porous layer or panel).
    pub cavity_depth: f64,
    /// Whether panel treatments carry a porous layer in the cavity.
    pub porous_fill: bool,
    /// Membrane surface density in kg/m².
    pub surface_density: f64,
    /// Hole diameter in metres (perforated and microperforated).
    pub hole_diameter: f64,
    /// Hole centre spacing in metres.
    pub hole_spacing: f64,
    /// Slot width in metres.
    pub slot_width: f64,
    /// Slot centre spacing in metres.
    pub slot_spacing: f64,
    /// Panel thickness in metres.
    pub panel_thickness: f64,
    /// Microperforated open area fraction.
    pub perforation_ratio: f64,
    /// Ambient temperature in °C.
    pub temperature: f64,
    pub f_start: f64,
    pub f_stop: f64,
    pub points: usize,
}

impl Default for TreatmentParams {
    fn default() -> Self {
        Self {
            kind: TreatmentKind::PorousRigid,
            porous_model: PorousModelKind::DelanyBazley,
            sigma: 10_000.0,
            porosity: 0.98,
            tortuosity: 1.02,
            viscous_length: 100e-6, // 100 µm
            thermal_length: 200e-6, // 200 µm
            porous_depth: 50e-3,    // 50 mm
            cavity_depth: 50e-3,    // 50 mm
            porous_fill: false,
            surface_density: 1.0,
            hole_diameter: 5e-3,    // 5 mm
            hole_spacing: 20e-3,    // 20 mm
            slot_width: 5e-3,       // 5 mm
            slot_spacing: 50e-3,    // 50 mm
            panel_thickness: 3e-3,  // 3 mm
            perforation_ratio: 0.01,
            temperature: 20.0,
            f_start: 50.0,
            f_stop: 5_000.0,
            points: 1_000,
        }
    }
}

impl TreatmentParams {
    /// Defaults tuned to each treatment family.
    pub fn preset(kind: TreatmentKind) -> Self {
        let base = Self {
            kind,
            ..Self::default()
        };
        match kind {
            TreatmentKind::PorousRigid => Self {
                porous_depth: 100e-3,
                f_start: 100.0,
                f_stop: 10_000.0,
                ..base
            },
            TreatmentKind::PorousAirGap => Self {
                porous_depth: 25e-3,
                cavity_depth: 75e-3,
                ..base
            },
            TreatmentKind::Membrane => Self {
                cavity_depth: 100e-3,
                porous_depth: 50e-3,
                porous_fill: true,
                f_stop: 1_000.0,
                ..base
            },
            TreatmentKind::Perforated => Self {
                porous_depth: 25e-3,
                porous_fill: true,
                f_stop: 2_000.0,
                ..base
            },
            TreatmentKind::Slotted => Self {
                panel_thickness: 12e-3,
                porous_fill: true,
                f_stop: 2_000.0,
                ..base
            },
            TreatmentKind::Microperforated => Self {
                hole_diameter: 0.2e-3,
                panel_thickness: 0.2e-3,
                cavity_depth: 60e-3,
                f_stop: 4_000.0,
                ..base
            },
        }
    }

    pub fn material(&self) -> Material {
        match self.porous_model {
            PorousModelKind::DelanyBazley => Material::DelanyBazley(DelanyBazley { sigma: self.sigma }),
            PorousModelKind::Miki => Material::Miki(Miki { sigma: self.sigma }),
            PorousModelKind::Jca => Material::Jca(Jca {
                sigma: self.sigma,
                porosity: self.porosity,
                tortuosity: self.tortuosity,
                viscous_length: self.viscous_length,
                thermal_length: self.thermal_length,
            }),
        }
    }

    pub fn panel(&self) -> Option<Panel> {
        match self.kind {
            TreatmentKind::PorousRigid | TreatmentKind::PorousAirGap => None,
            TreatmentKind::Membrane => Some(Panel::Membrane {
                surface_density: self.surface_density,
                resistance: 0.0,
            }),
            TreatmentKind::Perforated => Some(Panel::Perforated {
                hole_diameter: self.hole_diameter,
                hole_spacing: self.hole_spacing,
                thickness: self.panel_thickness,
            }),
            TreatmentKind::Slotted => Some(Panel::Slotted {
                slot_width: self.slot_width,
                slot_spacing: self.slot_spacing,
                thickness: self.panel_thickness,
            }),
            TreatmentKind::Microperforated => Some(Panel::Microperforated {
                hole_diameter: self.hole_diameter,
                thickness: self.panel_thickness,
                perforation_ratio: self.perforation_ratio,
            }),
        }
    }

    /// Depth of air (and porous fill) between a panel and the wall.
    pub fn backing_depth(&self) -> f64 {
        if self.porous_fill {
            self.porous_depth + self.cavity_depth
        } else {
            self.cavity_depth
        }
    }

    /// Lumped mass-spring estimate of the panel resonance in Hz, when the
    /// panel type has one.
    pub fn resonance_estimate(&self) -> Option<f64> {
        let air = AirProperties::from_temperature(self.temperature).ok()?;
        self.panel()?.resonance_frequency(self.backing_depth(), &air)
    }

    /// Layers from the exposed face to the wall.
    pub fn layers(&self) -> Vec<LayerConfig> {
        let porous = LayerConfig::Porous {
            depth: self.porous_depth,
            material: self.material(),
        };
        let cavity = LayerConfig::AirGap {
            depth: self.cavity_depth,
        };
        match self.panel() {
            None if self.kind == TreatmentKind::PorousRigid => vec![porous],
            None => vec![porous, cavity],
            Some(panel) => {
                let mut layers = vec![LayerConfig::Panel { panel }];
                if self.porous_fill {
                    layers.push(porous);
                }
                layers.push(cavity);
                layers
            }
        }
    }

    pub fn scenario(&self) -> Scenario {
        Scenario {
            name: self.kind.label().to_string(),
            description: None,
            air: AirConfig {
                rho0: None,
                c0: None,
                temperature: Some(self.temperature),
            },
            thermodynamics: None,
            frequency: FrequencyConfig {
                start: self.f_start,
                stop: self.f_stop,
                step: None,
                points: Some(self.points),
            },
            layers: self.layers(),
        }
    }
}

/// Run the full pipeline for a parameter set: build the layer stack, sweep
/// the frequency range, evaluate absorption.
pub fn compute(params: &TreatmentParams) -> Result<AbsorptionCurve> {
    let scenario = params.scenario();
    scenario.validate()?;
    scenario.evaluate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_evaluates() {
        for kind in TreatmentKind::ALL {
            let params = TreatmentParams::preset(kind);
            let curve = compute(&params).unwrap_or_else(|e| panic!("{kind:?} failed: {e}"));
            assert_eq!(curve.len(), params.points);
            let (f_peak, a_peak) = curve.peak().expect("curve has finite points");
            assert!(
                a_peak > 0.3 && a_peak <= 1.0,
                "{kind:?}: peak {a_peak} at {f_peak} Hz"
            );
        }
    }

    #[test]
    fn test_layer_order_front_to_back() {
        let params = TreatmentParams::preset(TreatmentKind::Perforated);
        let layers = params.layers();
        assert_eq!(layers.len(), 3);
        assert!(matches!(layers[0], LayerConfig::Panel { .. }));
        assert!(matches!(layers[1], LayerConfig::Porous { .. }));
        assert!(matches!(layers[2], LayerConfig::AirGap { .. }));

        let rigid = TreatmentParams::preset(TreatmentKind::PorousRigid).layers();
        assert_eq!(rigid.len(), 1);
    }

    #[test]
    fn test_resonance_estimate_tracks_curve_peak() {
        let params = TreatmentParams::preset(TreatmentKind::Membrane);
        let f0 = params.resonance_estimate().expect("membrane has a resonance");
        let (f_peak, _) = compute(&params).unwrap().peak().unwrap();
        assert!(
            (f_peak - f0).abs() / f0 < 0.25,
            "estimate {f0} Hz vs peak {f_peak} Hz"
        );
        assert!(TreatmentParams::preset(TreatmentKind::PorousRigid)
            .resonance_estimate()
            .is_none());
        assert!(TreatmentParams::preset(TreatmentKind::Microperforated)
            .resonance_estimate()
            .is_none());
    }

    #[test]
    fn test_compute_reports_invalid_params() {
        let params = TreatmentParams {
            porous_depth: 0.0,
            ..TreatmentParams::default()
        };
        assert!(compute(&params).is_err());
    }

    #[test]
    fn test_jca_choice_builds_jca_material() {
        let params = TreatmentParams {
            porous_model: PorousModelKind::Jca,
            ..TreatmentParams::default()
        };
        assert!(matches!(params.material(), Material::Jca(_)));
        assert!(compute(&params).is_ok());
    }
}
