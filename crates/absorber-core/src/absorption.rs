use crate::constants::AirProperties;
use crate::error::Result;
use num_complex::Complex64;
use std::f64::consts::FRAC_PI_2;

/// Normal-incidence reflection coefficient `(Zs − ρ₀c₀)/(Zs + ρ₀c₀)`.
///
/// An infinite `Zs` (rigid termination or an anti-resonance) reflects
/// totally; NaN propagates.
pub fn reflection_coefficient(zs: Complex64, air: &AirProperties) -> Complex64 {
    reflection_coefficient_oblique(zs, air, 0.0)
}

/// Reflection coefficient of a locally reacting surface for a plane wave
/// arriving at `theta` radians from the normal.
pub fn reflection_coefficient_oblique(zs: Complex64, air: &AirProperties, theta: f64) -> Complex64 {
    if zs.is_infinite() {
        return Complex64::new(1.0, 0.0);
    }
    let z0 = Complex64::new(air.characteristic_impedance(), 0.0);
    let zn = zs * theta.cos();
    (zn - z0) / (zn + z0)
}

/// `1 − |Vp|²`. Not clamped: an active (`Re(Zs) < 0`) input yields values
/// outside [0, 1].
pub fn absorption_coefficient(zs: Complex64, air: &AirProperties) -> f64 {
    1.0 - reflection_coefficient(zs, air).norm_sqr()
}

/// Element-wise normal-incidence absorption of a surface impedance curve.
pub fn absorption(zs: &[Complex64], rho0: f64, c0: f64) -> Result<Vec<f64>> {
    let air = AirProperties::new(rho0, c0)?;
    Ok(zs.iter().map(|&z| absorption_coefficient(z, &air)).collect())
}

/// Diffuse-field (random incidence) absorption of a locally reacting
/// surface, from Paris' formula
///
/// ```text
/// α_d = ∫₀^{π/2} (1 − |V(θ)|²) · sin 2θ dθ
/// ```
///
/// integrated with composite Simpson over 90 intervals.
pub fn diffuse_field_absorption(zs: Complex64, air: &AirProperties) -> f64 {
    const INTERVALS: usize = 90;
    if zs.is_infinite() {
        return 0.0;
    }
    let h = FRAC_PI_2 / INTERVALS as f64;
    let integrand = |theta: f64| {
        let v = reflection_coefficient_oblique(zs, air, theta);
        (1.0 - v.norm_sqr()) * (2.0 * theta).sin()
    };

    let mut sum = integrand(0.0) + integrand(FRAC_PI_2);
    for i in 1..INTERVALS {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * integrand(i as f64 * h);
    }
    sum * h / 3.0
}
