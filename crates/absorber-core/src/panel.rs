use crate::constants::{AirProperties, Thermodynamics};
use crate::error::{require_len, require_non_negative, require_positive, AbsorberError, Result};
use crate::frequency::FrequencyVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};

/// Hole diameter separating the perforated and microperforated regimes.
pub const MICRO_HOLE_LIMIT: f64 = 1e-3;

/// Thin facing placed in front of a cavity or porous layer. Every variant
/// contributes a series impedance `Zp(ω)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Panel {
    /// Limp membrane: `r + iωm`.
    Membrane {
        /// Surface density in kg/m².
        surface_density: f64,
        /// Optional flow resistance in Pa·s/m.
        #[serde(default)]
        resistance: f64,
    },
    /// Circular holes on a square grid, millimetre-scale (Crandall/Ingard).
    Perforated {
        hole_diameter: f64,
        /// Centre-to-centre hole spacing in m.
        hole_spacing: f64,
        thickness: f64,
    },
    /// Parallel slots.
    Slotted {
        slot_width: f64,
        /// Centre-to-centre slot spacing in m.
        slot_spacing: f64,
        thickness: f64,
    },
    /// Sub-millimetre holes (Maa).
    Microperforated {
        hole_diameter: f64,
        thickness: f64,
        /// Open area fraction ε.
        perforation_ratio: f64,
    },
}

impl Panel {
    /// Perforated panel sized from an open-area ratio instead of a spacing,
    /// assuming a square grid.
    pub fn perforated_from_ratio(hole_diameter: f64, perforation_ratio: f64, thickness: f64) -> Result<Self> {
        require_positive("hole_diameter", hole_diameter)?;
        check_ratio(perforation_ratio)?;
        let radius = hole_diameter / 2.0;
        let hole_spacing = radius * (PI / perforation_ratio).sqrt();
        let panel = Panel::Perforated {
            hole_diameter,
            hole_spacing,
            thickness,
        };
        panel.validate()?;
        Ok(panel)
    }

    /// Open area fraction ε. Zero for a membrane.
    pub fn perforation_ratio(&self) -> f64 {
        match *self {
            Panel::Membrane { .. } => 0.0,
            Panel::Perforated {
                hole_diameter,
                hole_spacing,
                ..
            } => PI * (hole_diameter / 2.0).powi(2) / hole_spacing.powi(2),
            Panel::Slotted {
                slot_width,
                slot_spacing,
                ..
            } => slot_width / slot_spacing,
            Panel::Microperforated {
                perforation_ratio, ..
            } => perforation_ratio,
        }
    }

    /// Physical thickness of the facing in m (membranes are treated as
    /// infinitely thin).
    pub fn thickness(&self) -> f64 {
        match *self {
            Panel::Membrane { .. } => 0.0,
            Panel::Perforated { thickness, .. }
            | Panel::Slotted { thickness, .. }
            | Panel::Microperforated { thickness, .. } => thickness,
        }
    }

    /// Neck length including both end corrections, for perforates.
    pub fn effective_length(&self) -> Option<f64> {
        let eps = self.perforation_ratio();
        match *self {
            Panel::Membrane { .. } | Panel::Microperforated { .. } => None,
            Panel::Perforated {
                hole_diameter,
                thickness,
                ..
            } => {
                let a = hole_diameter / 2.0;
                let delta = 0.85 * a * (1.0 - 1.47 * eps.sqrt() + 0.47 * eps.powf(1.5));
                Some(thickness + 2.0 * delta)
            }
            Panel::Slotted {
                slot_width,
                thickness,
                ..
            } => {
                let delta = -(slot_width / PI) * (PI * eps / 2.0).sin().ln();
                Some(thickness + 2.0 * delta)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Panel::Membrane {
                surface_density,
                resistance,
            } => {
                require_positive("surface_density", surface_density)?;
                require_non_negative("resistance", resistance)?;
            }
            Panel::Perforated {
                hole_diameter,
                hole_spacing,
                thickness,
            } => {
                require_positive("hole_diameter", hole_diameter)?;
                require_positive("hole_spacing", hole_spacing)?;
                require_positive("thickness", thickness)?;
                if hole_diameter >= hole_spacing {
                    return Err(AbsorberError::InvalidParameter {
                        name: "hole_diameter",
                        value: hole_diameter,
                        reason: "holes must be smaller than their spacing",
                    });
                }
            }
            Panel::Slotted {
                slot_width,
                slot_spacing,
                thickness,
            } => {
                require_positive("slot_width", slot_width)?;
                require_positive("slot_spacing", slot_spacing)?;
                require_positive("thickness", thickness)?;
                if slot_width >= slot_spacing {
                    return Err(AbsorberError::InvalidParameter {
                        name: "slot_width",
                        value: slot_width,
                        reason: "slots must be narrower than their spacing",
                    });
                }
            }
            Panel::Microperforated {
                hole_diameter,
                thickness,
                perforation_ratio,
            } => {
                require_positive("hole_diameter", hole_diameter)?;
                require_positive("thickness", thickness)?;
                check_ratio(perforation_ratio)?;
            }
        }
        Ok(())
    }

    /// Log an advisory when the hole size sits in the other model's regime.
    pub(crate) fn warn_if_out_of_regime(&self) {
        match *self {
            Panel::Perforated { hole_diameter, .. } if hole_diameter < MICRO_HOLE_LIMIT => {
                tracing::warn!(
                    hole_diameter,
                    "sub-millimetre holes: the microperforated model is more accurate"
                );
            }
            Panel::Microperforated { hole_diameter, .. } if hole_diameter > MICRO_HOLE_LIMIT => {
                tracing::warn!(
                    hole_diameter,
                    "holes above 1 mm are outside the microperforated model's range"
                );
            }
            _ => {}
        }
    }

    /// Series impedance `Zp` of the facing at angular frequency `omega`.
    pub fn impedance(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> Complex64 {
        let rho0 = air.rho0;
        match *self {
            Panel::Membrane {
                surface_density,
                resistance,
            } => Complex64::new(resistance, omega * surface_density),
            Panel::Perforated {
                hole_diameter,
                thickness,
                ..
            } => {
                let eps = self.perforation_ratio();
                let a = hole_diameter / 2.0;
                let nu = thermo.kinematic_viscosity(air);
                let resistance = (rho0 / eps) * (8.0 * nu * omega).sqrt() * (1.0 + thickness / (2.0 * a));
                let mass = (rho0 / eps) * self.effective_length().unwrap_or(thickness);
                Complex64::new(resistance, omega * mass)
            }
            Panel::Slotted {
                slot_width,
                thickness,
                ..
            } => {
                let eps = self.perforation_ratio();
                let nu = thermo.kinematic_viscosity(air);
                let resistance = (rho0 / eps) * (8.0 * nu * omega).sqrt() * (1.0 + thickness / slot_width);
                let mass = (rho0 / eps) * self.effective_length().unwrap_or(thickness);
                Complex64::new(resistance, omega * mass)
            }
            Panel::Microperforated {
                hole_diameter,
                thickness,
                perforation_ratio,
            } => {
                let eta = thermo.viscosity;
                let (dh, t, eps) = (hole_diameter, thickness, perforation_ratio);
                // Perforate constant: hole radius over the viscous boundary layer.
                let x = dh / 2.0 * (omega * rho0 / eta).sqrt();
                let resistance = 32.0 * eta * t / (eps * dh * dh)
                    * ((1.0 + x * x / 32.0).sqrt() + SQRT_2 / 32.0 * x * dh / t);
                let reactance = omega * rho0 * t / eps
                    * (1.0 + 1.0 / (9.0 + x * x / 2.0).sqrt() + 0.85 * dh / t);
                Complex64::new(resistance, reactance)
            }
        }
    }

    /// Frequency of the mass-spring resonance against an air cavity of
    /// depth `cavity` (low-frequency lumped approximation).
    pub fn resonance_frequency(&self, cavity: f64, air: &AirProperties) -> Option<f64> {
        match *self {
            Panel::Membrane {
                surface_density, ..
            } => Some(
                (air.rho0 * air.c0 * air.c0 / (surface_density * cavity)).sqrt() / (2.0 * PI),
            ),
            Panel::Perforated { .. } | Panel::Slotted { .. } => self
                .effective_length()
                .map(|l| air.c0 / (2.0 * PI) * (self.perforation_ratio() / (cavity * l)).sqrt()),
            Panel::Microperforated { .. } => None,
        }
    }
}

fn check_ratio(ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(AbsorberError::InvalidParameter {
            name: "perforation_ratio",
            value: ratio,
            reason: "must lie in (0, 1)",
        });
    }
    Ok(())
}

/// Surface impedance of `panel` placed in front of a backing whose
/// impedance per bin is `backing`: `Zs = Zp + Zb`.
pub fn panel_impedance(
    f: &FrequencyVector,
    panel: &Panel,
    backing: &[Complex64],
    air: &AirProperties,
    thermo: &Thermodynamics,
) -> Result<Vec<Complex64>> {
    panel.validate()?;
    air.validate()?;
    thermo.validate()?;
    require_len("backing", f.len(), backing.len())?;
    panel.warn_if_out_of_regime();

    Ok(f
        .angular()
        .into_iter()
        .zip(backing.iter())
        .map(|(omega, &zb)| panel.impedance(omega, air, thermo) + zb)
        .collect())
}
