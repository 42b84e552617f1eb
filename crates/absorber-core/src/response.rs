use crate::absorption::{absorption_coefficient, diffuse_field_absorption, reflection_coefficient};
use crate::constants::{AirProperties, Thermodynamics};
use crate::error::Result;
use crate::frequency::FrequencyVector;
use crate::layers::LayerStack;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Per-bin outcome of evaluating a treatment over a frequency vector.
#[derive(Debug, Clone, Default)]
pub struct AbsorptionCurve {
    /// Frequency bins in Hz.
    pub frequencies: Vec<f64>,
    /// Surface impedance at the exposed face (Pa·s/m).
    pub surface_impedance: Vec<Complex64>,
    /// Normal-incidence reflection coefficient.
    pub reflection: Vec<Complex64>,
    /// Normal-incidence absorption coefficient.
    pub absorption: Vec<f64>,
}

impl AbsorptionCurve {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `(frequency, alpha)` pairs, skipping bins where a singularity left a
    /// non-finite value.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.absorption.iter().copied())
            .filter(|(_, a)| a.is_finite())
    }

    /// Highest finite absorption and the frequency where it occurs.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.finite_points()
            .fold(None, |best: Option<(f64, f64)>, (f, a)| match best {
                Some((_, best_a)) if best_a >= a => best,
                _ => Some((f, a)),
            })
    }

    /// Absorption at `frequency`, linearly interpolated between bins.
    /// `None` outside the swept range.
    pub fn absorption_at(&self, frequency: f64) -> Option<f64> {
        let idx = self.frequencies.iter().position(|&f| f >= frequency)?;
        if self.frequencies[idx] == frequency {
            return Some(self.absorption[idx]);
        }
        if idx == 0 {
            return None;
        }
        let (f0, f1) = (self.frequencies[idx - 1], self.frequencies[idx]);
        let (a0, a1) = (self.absorption[idx - 1], self.absorption[idx]);
        Some(a0 + (a1 - a0) * (frequency - f0) / (f1 - f0))
    }

    /// Random-incidence absorption per bin (Paris formula).
    pub fn diffuse_absorption(&self, air: &AirProperties) -> Vec<f64> {
        self.surface_impedance
            .iter()
            .map(|&zs| diffuse_field_absorption(zs, air))
            .collect()
    }
}

fn evaluate_bin(
    stack: &LayerStack,
    frequency: f64,
    air: &AirProperties,
    thermo: &Thermodynamics,
) -> (Complex64, Complex64, f64) {
    let omega = 2.0 * PI * frequency;
    let zs = stack.surface_impedance(omega, air, thermo).impedance();
    (zs, reflection_coefficient(zs, air), absorption_coefficient(zs, air))
}

/// Evaluate `stack` at every frequency in `frequencies`.
pub fn sweep(
    stack: &LayerStack,
    frequencies: &FrequencyVector,
    air: &AirProperties,
    thermo: &Thermodynamics,
) -> Result<AbsorptionCurve> {
    air.validate()?;
    thermo.validate()?;
    stack.validate()?;
    stack.check_range(frequencies.as_slice(), air);

    let _span = tracing::debug_span!(
        "sweep",
        layers = stack.len(),
        bins = frequencies.len()
    )
    .entered();

    #[cfg(feature = "parallel")]
    let bins: Vec<(Complex64, Complex64, f64)> = {
        use rayon::prelude::*;
        frequencies
            .as_slice()
            .par_iter()
            .map(|&f| evaluate_bin(stack, f, air, thermo))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let bins: Vec<(Complex64, Complex64, f64)> = frequencies
        .iter()
        .map(|f| evaluate_bin(stack, f, air, thermo))
        .collect();

    let mut curve = AbsorptionCurve {
        frequencies: frequencies.as_slice().to_vec(),
        surface_impedance: Vec::with_capacity(bins.len()),
        reflection: Vec::with_capacity(bins.len()),
        absorption: Vec::with_capacity(bins.len()),
    };
    for (zs, vp, alpha) in bins {
        curve.surface_impedance.push(zs);
        curve.reflection.push(vp);
        curve.absorption.push(alpha);
    }

    let non_finite = curve.len() - curve.finite_points().count();
    if non_finite > 0 {
        tracing::debug!(bins = non_finite, "singular bins left unfiltered");
    }
    Ok(curve)
}
