//! Surface impedance of porous layers on rigid and air-gap backings.
//!
//! Singular bins (`tan(kc·d) = 0` for a lossless path) are not clamped:
//! they come back as IEEE infinities or NaN and callers filter them.

use crate::constants::AirProperties;
use crate::error::{require_len, require_non_negative, require_positive, AbsorberError, Result};
use crate::frequency::FrequencyVector;
use crate::porous::ImpedanceResult;
use crate::transfer_matrix::{Backing, TransferMatrix};
use num_complex::Complex64;

/// Single-step transfer: impedance at the front of a layer `(zc, kc, depth)`
/// sitting on `backing`.
///
/// Rigid backing gives `−i·Zc/tan(kc·d)`; a finite backing `Zb` gives
/// `(−i·Zb·Zc·cot(kc·d) + Zc²)/(Zb − i·Zc·cot(kc·d))`. Zero depth returns the
/// backing unchanged. Stacks of any depth are built by folding this from
/// the wall outward.
pub fn transfer(zc: Complex64, kc: Complex64, depth: f64, backing: Backing) -> Backing {
    if depth == 0.0 {
        return backing;
    }
    TransferMatrix::layer(zc, kc, depth).input_impedance(backing)
}

/// Impedance of an air cavity of depth `gap` closed by a rigid wall:
/// `−i·ρ₀c₀/tan(k₀·gap)`.
pub fn air_cavity(frequency: f64, gap: f64, air: &AirProperties) -> Backing {
    let z0 = Complex64::new(air.characteristic_impedance(), 0.0);
    let k0 = Complex64::new(air.wavenumber(frequency), 0.0);
    transfer(z0, k0, gap, Backing::Rigid)
}

/// Surface impedance of a porous layer of depth `d` on a rigid wall.
pub fn surface_impedance_rigid(result: &ImpedanceResult, d: f64) -> Result<Vec<Complex64>> {
    require_positive("d", d)?;
    Ok(result
        .zc
        .iter()
        .zip(result.kc.iter())
        .map(|(&zc, &kc)| {
            let j = Complex64::new(0.0, 1.0);
            -j * zc / (kc * d).tan()
        })
        .collect())
}

/// Depth of the air cavity between a layer of depth `d` and a wall
/// `total_depth` behind its exposed face. A wall in front of the layer's
/// back face is rejected.
pub(crate) fn backing_gap(d: f64, total_depth: f64) -> Result<f64> {
    if total_depth < d {
        return Err(AbsorberError::InvalidParameter {
            name: "total_depth",
            value: total_depth,
            reason: "rigid backing must lie behind the absorber (total_depth >= d)",
        });
    }
    require_non_negative("gap", total_depth - d)
}

/// Surface impedance of a porous layer of depth `d` whose back face sits
/// `total_depth - d` in front of a rigid wall.
///
/// `total_depth` is the distance from the exposed face to the wall. Equal
/// depths mean there is no cavity and the rigid result is returned.
pub fn surface_impedance_air_gap(
    result: &ImpedanceResult,
    d: f64,
    total_depth: f64,
    air: &AirProperties,
    f: &FrequencyVector,
) -> Result<Vec<Complex64>> {
    require_positive("d", d)?;
    require_positive("total_depth", total_depth)?;
    air.validate()?;
    require_len("frequencies", result.len(), f.len())?;
    let gap = backing_gap(d, total_depth)?;
    if gap == 0.0 {
        return surface_impedance_rigid(result, d);
    }

    Ok(f
        .iter()
        .zip(result.zc.iter().zip(result.kc.iter()))
        .map(|(freq, (&zc, &kc))| {
            let cavity = air_cavity(freq, gap, air);
            transfer(zc, kc, d, cavity).impedance()
        })
        .collect())
}
