//! Macroscopic models for rigid-frame porous absorbers.
//!
//! Each model maps a frequency to the complex characteristic impedance `Zc`
//! and complex wavenumber `kc` of the equivalent fluid filling the material,
//! using the `e^{+iωt}` time convention (attenuation shows up as a negative
//! imaginary part of `kc`).

use crate::constants::{AirProperties, Thermodynamics};
use crate::error::{require_len, require_positive, AbsorberError, Result};
use crate::frequency::FrequencyVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Characteristic impedance and wavenumber per frequency bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpedanceResult {
    pub zc: Vec<Complex64>,
    pub kc: Vec<Complex64>,
}

impl ImpedanceResult {
    pub fn new(zc: Vec<Complex64>, kc: Vec<Complex64>) -> Result<Self> {
        require_len("kc", zc.len(), kc.len())?;
        Ok(Self { zc, kc })
    }

    pub fn len(&self) -> usize {
        self.zc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zc.is_empty()
    }
}

/// Anything that behaves as an equivalent fluid at a single frequency.
pub trait PorousModel: Send + Sync {
    /// `(Zc, kc)` at frequency `f` (Hz).
    fn characteristic(&self, f: f64, air: &AirProperties, thermo: &Thermodynamics) -> (Complex64, Complex64);

    /// Check the material parameters. Called once before a sweep.
    fn validate(&self) -> Result<()>;

    /// Advisory model-range check; returns the number of bins outside the
    /// empirically validated range.
    fn out_of_range_bins(&self, _frequencies: &[f64], _air: &AirProperties) -> usize {
        0
    }

    fn name(&self) -> &'static str;
}

/// Evaluate a model over a whole frequency vector.
pub fn characterise(
    model: &dyn PorousModel,
    frequencies: &FrequencyVector,
    air: &AirProperties,
    thermo: &Thermodynamics,
) -> Result<ImpedanceResult> {
    model.validate()?;
    air.validate()?;

    let outside = model.out_of_range_bins(frequencies.as_slice(), air);
    if outside > 0 {
        tracing::warn!(
            model = model.name(),
            bins = outside,
            total = frequencies.len(),
            "evaluating outside the model's validated range"
        );
    }

    let (zc, kc): (Vec<_>, Vec<_>) = frequencies
        .iter()
        .map(|f| model.characteristic(f, air, thermo))
        .unzip();
    ImpedanceResult::new(zc, kc)
}

// ---------------------------------------------------------------------------
// Delany-Bazley
// ---------------------------------------------------------------------------

/// Delany & Bazley (1970) empirical power-law model, written in terms of
/// the dimensionless `X = ρ₀f/σ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelanyBazley {
    /// Flow resistivity σ in N·s/m⁴.
    pub sigma: f64,
}

impl DelanyBazley {
    pub fn new(sigma: f64) -> Result<Self> {
        Ok(Self {
            sigma: require_positive("sigma", sigma)?,
        })
    }

    /// `X` range over which the regression was fitted.
    pub fn in_validity_range(x: f64) -> bool {
        (0.01..=1.0).contains(&x)
    }

    pub fn dimensionless(&self, f: f64, air: &AirProperties) -> f64 {
        air.rho0 * f / self.sigma
    }
}

impl PorousModel for DelanyBazley {
    fn characteristic(&self, f: f64, air: &AirProperties, _thermo: &Thermodynamics) -> (Complex64, Complex64) {
        let x = self.dimensionless(f, air);
        let z0 = air.characteristic_impedance();
        let k0 = air.wavenumber(f);

        let zc = z0 * Complex64::new(1.0 + 0.0571 * x.powf(-0.754), -0.087 * x.powf(-0.732));
        let kc = k0 * Complex64::new(1.0 + 0.0978 * x.powf(-0.700), -0.189 * x.powf(-0.595));
        (zc, kc)
    }

    fn validate(&self) -> Result<()> {
        require_positive("sigma", self.sigma).map(|_| ())
    }

    fn out_of_range_bins(&self, frequencies: &[f64], air: &AirProperties) -> usize {
        frequencies
            .iter()
            .filter(|&&f| !Self::in_validity_range(self.dimensionless(f, air)))
            .count()
    }

    fn name(&self) -> &'static str {
        "delany-bazley"
    }
}

/// Characteristic impedance and wavenumber of a porous layer under the
/// Delany-Bazley model.
///
/// Bins outside `0.01 ≤ ρ₀f/σ ≤ 1` are still computed; a warning is logged.
pub fn delany_bazley(f: &FrequencyVector, sigma: f64, c0: f64, rho0: f64) -> Result<ImpedanceResult> {
    let air = AirProperties::new(rho0, c0)?;
    let model = DelanyBazley::new(sigma)?;
    characterise(&model, f, &air, &Thermodynamics::default())
}

// ---------------------------------------------------------------------------
// Miki
// ---------------------------------------------------------------------------

/// Miki (1990) refit of the Delany-Bazley data, which keeps `Re(Zc)` positive
/// at low frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Miki {
    pub sigma: f64,
}

impl Miki {
    pub fn new(sigma: f64) -> Result<Self> {
        Ok(Self {
            sigma: require_positive("sigma", sigma)?,
        })
    }
}

impl PorousModel for Miki {
    fn characteristic(&self, f: f64, air: &AirProperties, _thermo: &Thermodynamics) -> (Complex64, Complex64) {
        let x = f / self.sigma;
        let z0 = air.characteristic_impedance();
        let k0 = air.wavenumber(f);

        let zr = x.powf(-0.632);
        let kr = x.powf(-0.618);
        let zc = z0 * Complex64::new(1.0 + 0.0699 * zr, -0.107 * zr);
        let kc = k0 * Complex64::new(1.0 + 0.109 * kr, -0.160 * kr);
        (zc, kc)
    }

    fn validate(&self) -> Result<()> {
        require_positive("sigma", self.sigma).map(|_| ())
    }

    fn out_of_range_bins(&self, frequencies: &[f64], _air: &AirProperties) -> usize {
        // Miki's fit covers 0.01 < f/σ < 1.0 as well.
        frequencies
            .iter()
            .filter(|&&f| !(0.01..=1.0).contains(&(f / self.sigma)))
            .count()
    }

    fn name(&self) -> &'static str {
        "miki"
    }
}

// ---------------------------------------------------------------------------
// Johnson-Champoux-Allard
// ---------------------------------------------------------------------------

/// Johnson-Champoux-Allard five-parameter model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jca {
    /// Flow resistivity σ in N·s/m⁴.
    pub sigma: f64,
    /// Open porosity φ ∈ (0, 1].
    pub porosity: f64,
    /// High-frequency tortuosity α∞ ≥ 1.
    pub tortuosity: f64,
    /// Viscous characteristic length Λ in m.
    pub viscous_length: f64,
    /// Thermal characteristic length Λ' in m.
    pub thermal_length: f64,
}

impl Jca {
    pub fn new(
        sigma: f64,
        porosity: f64,
        tortuosity: f64,
        viscous_length: f64,
        thermal_length: f64,
    ) -> Result<Self> {
        let jca = Self {
            sigma,
            porosity,
            tortuosity,
            viscous_length,
            thermal_length,
        };
        jca.validate()?;
        Ok(jca)
    }

    /// Viscous characteristic angular frequency σφ/(ρ₀α∞).
    pub fn viscous_frequency(&self, air: &AirProperties) -> f64 {
        self.sigma * self.porosity / (air.rho0 * self.tortuosity)
    }

    /// Thermal characteristic angular frequency 8η/(ρ₀·Pr·Λ'²).
    pub fn thermal_frequency(&self, air: &AirProperties, thermo: &Thermodynamics) -> f64 {
        8.0 * thermo.viscosity / (air.rho0 * thermo.prandtl * self.thermal_length.powi(2))
    }

    /// Effective dynamic density ρ_eff(ω).
    pub fn dynamic_density(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> Complex64 {
        let j = Complex64::new(0.0, 1.0);
        let phi = self.porosity;
        let alpha = self.tortuosity;
        let g_v = (1.0
            + j * 4.0 * alpha.powi(2) * thermo.viscosity * air.rho0 * omega
                / (self.sigma.powi(2) * self.viscous_length.powi(2) * phi.powi(2)))
        .sqrt();
        let omega_v = self.viscous_frequency(air);

        (alpha * air.rho0 / phi) * (1.0 + omega_v / (j * omega) * g_v)
    }

    /// Effective bulk modulus K_eff(ω).
    pub fn bulk_modulus(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> Complex64 {
        let j = Complex64::new(0.0, 1.0);
        let gamma = thermo.gamma;
        let g_t = (1.0
            + j * air.rho0 * omega * thermo.prandtl * self.thermal_length.powi(2)
                / (16.0 * thermo.viscosity))
            .sqrt();
        let omega_t = self.thermal_frequency(air, thermo);

        let relaxation = 1.0 + omega_t / (j * omega) * g_t;
        (gamma * thermo.static_pressure / self.porosity) / (gamma - (gamma - 1.0) / relaxation)
    }
}

impl PorousModel for Jca {
    fn characteristic(&self, f: f64, air: &AirProperties, thermo: &Thermodynamics) -> (Complex64, Complex64) {
        let omega = 2.0 * PI * f;
        let rho = self.dynamic_density(omega, air, thermo);
        let k = self.bulk_modulus(omega, air, thermo);
        ((rho * k).sqrt(), omega * (rho / k).sqrt())
    }

    fn validate(&self) -> Result<()> {
        require_positive("sigma", self.sigma)?;
        require_positive("viscous_length", self.viscous_length)?;
        require_positive("thermal_length", self.thermal_length)?;
        if !(self.porosity > 0.0 && self.porosity <= 1.0) {
            return Err(AbsorberError::InvalidParameter {
                name: "porosity",
                value: self.porosity,
                reason: "must lie in (0, 1]",
            });
        }
        if !(self.tortuosity >= 1.0 && self.tortuosity.is_finite()) {
            return Err(AbsorberError::InvalidParameter {
                name: "tortuosity",
                value: self.tortuosity,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jca"
    }
}

/// Characteristic impedance and wavenumber under the JCA model.
pub fn jca(
    f: &FrequencyVector,
    material: &Jca,
    air: &AirProperties,
    thermo: &Thermodynamics,
) -> Result<ImpedanceResult> {
    thermo.validate()?;
    characterise(material, f, air, thermo)
}

// ---------------------------------------------------------------------------
// Model selection
// ---------------------------------------------------------------------------

/// Closed set of porous models, used by layer stacks and scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum Material {
    DelanyBazley(DelanyBazley),
    Miki(Miki),
    Jca(Jca),
}

impl Material {
    pub fn as_model(&self) -> &dyn PorousModel {
        match self {
            Material::DelanyBazley(m) => m,
            Material::Miki(m) => m,
            Material::Jca(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_band() -> FrequencyVector {
        FrequencyVector::stepped(100.0, 10_000.0, 10.0).unwrap()
    }

    #[test]
    fn test_delany_bazley_shape_and_positive_resistance() {
        let f = audio_band();
        for sigma in [2_000.0, 10_000.0, 50_000.0] {
            let r = delany_bazley(&f, sigma, 343.0, 1.21).unwrap();
            assert_eq!(r.zc.len(), f.len());
            assert_eq!(r.kc.len(), f.len());
            for (i, zc) in r.zc.iter().enumerate() {
                assert!(zc.re > 0.0, "Re(Zc) must be positive at bin {i}, sigma {sigma}: {zc}");
            }
            for kc in &r.kc {
                assert!(kc.im < 0.0, "kc must attenuate: {kc}");
            }
        }
    }

    #[test]
    fn test_delany_bazley_reference_value() {
        // X = 1.21 * 1000 / 10000 = 0.121
        let f = FrequencyVector::new(vec![1000.0]).unwrap();
        let r = delany_bazley(&f, 10_000.0, 343.0, 1.21).unwrap();
        let x: f64 = 0.121;
        let z0 = 1.21 * 343.0;
        let expected_re = z0 * (1.0 + 0.0571 * x.powf(-0.754));
        let expected_im = -z0 * 0.087 * x.powf(-0.732);
        assert!((r.zc[0].re - expected_re).abs() < 1e-9);
        assert!((r.zc[0].im - expected_im).abs() < 1e-9);
        // Tends to air at high frequency: Re(Zc)/ρc ≈ 1.28 at this X
        assert!((r.zc[0].re / z0 - 1.28).abs() < 0.01, "Zc/z0 = {}", r.zc[0] / z0);
    }

    #[test]
    fn test_delany_bazley_rejects_bad_parameters() {
        let f = audio_band();
        assert!(delany_bazley(&f, 0.0, 343.0, 1.21).is_err());
        assert!(delany_bazley(&f, -10.0, 343.0, 1.21).is_err());
        assert!(delany_bazley(&f, 10_000.0, 0.0, 1.21).is_err());
        assert!(delany_bazley(&f, 10_000.0, 343.0, -1.21).is_err());
    }

    #[test]
    fn test_delany_bazley_range_check() {
        let air = AirProperties::standard();
        let model = DelanyBazley::new(10_000.0).unwrap();
        // X = 0.0121 at 100 Hz (inside), 1.21 at 10 kHz (outside)
        assert!(DelanyBazley::in_validity_range(model.dimensionless(100.0, &air)));
        assert!(!DelanyBazley::in_validity_range(model.dimensionless(10_000.0, &air)));
        let outside = model.out_of_range_bins(&[100.0, 5_000.0, 10_000.0], &air);
        assert_eq!(outside, 1);
    }

    #[test]
    fn test_miki_close_to_delany_bazley_mid_band() {
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let db = DelanyBazley::new(10_000.0).unwrap();
        let miki = Miki::new(10_000.0).unwrap();
        let (z_db, k_db) = db.characteristic(1000.0, &air, &thermo);
        let (z_mk, k_mk) = miki.characteristic(1000.0, &air, &thermo);
        assert!((z_db - z_mk).norm() / z_db.norm() < 0.1, "{z_db} vs {z_mk}");
        assert!((k_db - k_mk).norm() / k_db.norm() < 0.1, "{k_db} vs {k_mk}");
    }

    fn glass_wool() -> Jca {
        Jca::new(20_000.0, 0.98, 1.02, 100e-6, 200e-6).unwrap()
    }

    #[test]
    fn test_jca_high_frequency_limit() {
        // At high frequency ρ_eff → α∞ρ₀/φ and K_eff → γP₀/φ, so the sound
        // speed tends to c/√α∞.
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let material = glass_wool();
        let omega = 2.0 * PI * 1.0e6;
        let rho = material.dynamic_density(omega, &air, &thermo);
        let k = material.bulk_modulus(omega, &air, &thermo);
        let rho_inf = material.tortuosity * air.rho0 / material.porosity;
        let k_inf = thermo.gamma * thermo.static_pressure / material.porosity;
        assert!((rho.re - rho_inf).abs() / rho_inf < 0.05, "rho = {rho}");
        assert!((k.re - k_inf).abs() / k_inf < 0.05, "K = {k}");
    }

    #[test]
    fn test_jca_low_frequency_isothermal_modulus() {
        // At low frequency the compression becomes isothermal: K_eff → P₀/φ.
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let material = glass_wool();
        let k = material.bulk_modulus(2.0 * PI * 0.01, &air, &thermo);
        let k_iso = thermo.static_pressure / material.porosity;
        assert!((k.re - k_iso).abs() / k_iso < 0.01, "K = {k}, expected ≈ {k_iso}");
    }

    #[test]
    fn test_jca_shape_and_passivity() {
        let f = audio_band();
        let r = jca(&f, &glass_wool(), &AirProperties::standard(), &Thermodynamics::default()).unwrap();
        assert_eq!(r.len(), f.len());
        for (zc, kc) in r.zc.iter().zip(r.kc.iter()) {
            assert!(zc.re > 0.0 && zc.im < 0.0, "Zc = {zc}");
            assert!(kc.re > 0.0 && kc.im < 0.0, "kc = {kc}");
            assert!(zc.is_finite() && kc.is_finite());
        }
    }

    #[test]
    fn test_jca_rejects_out_of_domain() {
        assert!(Jca::new(20_000.0, 0.0, 1.02, 100e-6, 200e-6).is_err());
        assert!(Jca::new(20_000.0, 1.2, 1.02, 100e-6, 200e-6).is_err());
        assert!(Jca::new(20_000.0, 0.98, 0.9, 100e-6, 200e-6).is_err());
        assert!(Jca::new(20_000.0, 0.98, 1.02, 0.0, 200e-6).is_err());
        assert!(Jca::new(-1.0, 0.98, 1.02, 100e-6, 200e-6).is_err());
        assert!(Jca::new(20_000.0, 1.0, 1.0, 100e-6, 200e-6).is_ok());
    }

    #[test]
    fn test_material_serde_tag() {
        let m: Material = toml::from_str("model = \"delany-bazley\"\nsigma = 4000.0\n").unwrap();
        assert_eq!(m, Material::DelanyBazley(DelanyBazley { sigma: 4000.0 }));
        assert_eq!(m.as_model().name(), "delany-bazley");
    }
}
