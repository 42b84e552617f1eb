use crate::error::{require_positive, AbsorberError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Speed of sound in air (m/s) and density (kg/m³) as a function of
/// temperature in °C. Uses the ideal-gas approximation.
pub fn speed_of_sound_and_density(temperature_c: f64) -> (f64, f64) {
    let t_kelvin = temperature_c + 273.15;
    // c = 331.3 * sqrt(T/273.15)
    let c = 331.3 * (t_kelvin / 273.15).sqrt();
    // ρ = p / (R_specific * T), with p = 101325 Pa, R_specific = 287.05 J/(kg·K)
    let rho = 101325.0 / (287.05 * t_kelvin);
    (c, rho)
}

/// Ambient air: density `rho0` (kg/m³) and sound speed `c0` (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    pub rho0: f64,
    pub c0: f64,
}

impl AirProperties {
    pub fn new(rho0: f64, c0: f64) -> Result<Self> {
        Ok(Self {
            rho0: require_positive("rho0", rho0)?,
            c0: require_positive("c0", c0)?,
        })
    }

    /// Room-temperature air, 1.21 kg/m³ and 343 m/s.
    pub fn standard() -> Self {
        Self {
            rho0: 1.21,
            c0: 343.0,
        }
    }

    pub fn from_temperature(temperature_c: f64) -> Result<Self> {
        if !temperature_c.is_finite() || temperature_c <= -273.15 {
            return Err(AbsorberError::InvalidParameter {
                name: "temperature",
                value: temperature_c,
                reason: "must be above absolute zero",
            });
        }
        let (c0, rho0) = speed_of_sound_and_density(temperature_c);
        Ok(Self { rho0, c0 })
    }

    /// Characteristic impedance of air, ρ₀c₀ (Pa·s/m).
    pub fn characteristic_impedance(&self) -> f64 {
        self.rho0 * self.c0
    }

    /// Free-field wavenumber k₀ = 2πf/c₀.
    pub fn wavenumber(&self, frequency: f64) -> f64 {
        2.0 * PI * frequency / self.c0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_positive("rho0", self.rho0)?;
        require_positive("c0", self.c0)?;
        Ok(())
    }
}

impl Default for AirProperties {
    fn default() -> Self {
        Self::standard()
    }
}

/// Thermodynamic constants of air needed by the JCA model and the
/// perforate formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thermodynamics {
    /// Ratio of specific heats γ.
    pub gamma: f64,
    /// Static pressure P₀ in Pa.
    pub static_pressure: f64,
    /// Prandtl number.
    pub prandtl: f64,
    /// Dynamic viscosity η in Pa·s.
    pub viscosity: f64,
}

impl Thermodynamics {
    /// Kinematic viscosity ν = η/ρ₀ (m²/s).
    pub fn kinematic_viscosity(&self, air: &AirProperties) -> f64 {
        self.viscosity / air.rho0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_positive("static_pressure", self.static_pressure)?;
        require_positive("prandtl", self.prandtl)?;
        require_positive("viscosity", self.viscosity)?;
        if !self.gamma.is_finite() || self.gamma <= 1.0 {
            return Err(AbsorberError::InvalidParameter {
                name: "gamma",
                value: self.gamma,
                reason: "ratio of specific heats must exceed 1",
            });
        }
        Ok(())
    }
}

impl Default for Thermodynamics {
    fn default() -> Self {
        Self {
            gamma: 1.4,
            static_pressure: 101_325.0,
            prandtl: 0.71,
            viscosity: 1.84e-5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_of_sound_at_20c() {
        let (c, rho) = speed_of_sound_and_density(20.0);
        assert!((c - 343.2).abs() < 0.5, "c = {c}");
        assert!((rho - 1.204).abs() < 0.01, "rho = {rho}");
    }

    #[test]
    fn test_air_from_temperature_matches_helper() {
        let air = AirProperties::from_temperature(20.0).unwrap();
        let (c, rho) = speed_of_sound_and_density(20.0);
        assert_eq!(air.c0, c);
        assert_eq!(air.rho0, rho);
        assert!(AirProperties::from_temperature(-300.0).is_err());
    }

    #[test]
    fn test_standard_characteristic_impedance() {
        let air = AirProperties::standard();
        assert!((air.characteristic_impedance() - 415.03).abs() < 1e-9);
    }

    #[test]
    fn test_air_rejects_non_physical_values() {
        assert!(AirProperties::new(0.0, 343.0).is_err());
        assert!(AirProperties::new(1.21, -343.0).is_err());
    }

    #[test]
    fn test_default_thermodynamics_valid() {
        let thermo = Thermodynamics::default();
        thermo.validate().unwrap();
        let nu = thermo.kinematic_viscosity(&AirProperties::standard());
        assert!((nu - 1.5207e-5).abs() < 1e-8, "nu = {nu}");
    }
}
