use crate::constants::{AirProperties, Thermodynamics};
use crate::error::{require_positive, Result};
use crate::impedance::backing_gap;
use crate::panel::Panel;
use crate::porous::Material;
use crate::transfer_matrix::{Backing, TransferMatrix};
use crate::AcousticLayer;
use num_complex::Complex64;
use std::f64::consts::PI;

/// A rigid-frame porous layer.
#[derive(Debug, Clone)]
pub struct PorousLayer {
    pub material: Material,
    /// Thickness in metres.
    pub depth: f64,
}

impl PorousLayer {
    pub fn new(material: Material, depth: f64) -> Self {
        Self { material, depth }
    }
}

impl AcousticLayer for PorousLayer {
    fn transfer_matrix(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> TransferMatrix {
        let (zc, kc) = self
            .material
            .as_model()
            .characteristic(omega / (2.0 * PI), air, thermo);
        TransferMatrix::layer(zc, kc, self.depth)
    }

    fn validate(&self) -> Result<()> {
        require_positive("depth", self.depth)?;
        self.material.as_model().validate()
    }

    fn check_range(&self, frequencies: &[f64], air: &AirProperties) {
        let model = self.material.as_model();
        let outside = model.out_of_range_bins(frequencies, air);
        if outside > 0 {
            tracing::warn!(
                model = model.name(),
                bins = outside,
                total = frequencies.len(),
                "porous layer evaluated outside the model's validated range"
            );
        }
    }

    fn depth(&self) -> f64 {
        self.depth
    }
}

/// An air cavity.
#[derive(Debug, Clone)]
pub struct AirGap {
    pub depth: f64,
}

impl AirGap {
    pub fn new(depth: f64) -> Self {
        Self { depth }
    }
}

impl AcousticLayer for AirGap {
    fn transfer_matrix(&self, omega: f64, air: &AirProperties, _thermo: &Thermodynamics) -> TransferMatrix {
        let z0 = Complex64::new(air.characteristic_impedance(), 0.0);
        let k0 = Complex64::new(omega / air.c0, 0.0);
        TransferMatrix::layer(z0, k0, self.depth)
    }

    fn validate(&self) -> Result<()> {
        require_positive("depth", self.depth).map(|_| ())
    }

    fn depth(&self) -> f64 {
        self.depth
    }
}

impl AcousticLayer for Panel {
    fn transfer_matrix(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> TransferMatrix {
        TransferMatrix::series(self.impedance(omega, air, thermo))
    }

    fn validate(&self) -> Result<()> {
        Panel::validate(self)
    }

    fn check_range(&self, _frequencies: &[f64], _air: &AirProperties) {
        self.warn_if_out_of_regime();
    }

    fn depth(&self) -> f64 {
        self.thickness()
    }
}

/// An ordered stack of layers, listed from the exposed face towards the
/// rigid wall that terminates it.
pub struct LayerStack {
    layers: Vec<Box<dyn AcousticLayer>>,
}

impl LayerStack {
    pub fn new(layers: Vec<Box<dyn AcousticLayer>>) -> Self {
        Self { layers }
    }

    /// Porous layer of depth `d` directly on the wall.
    pub fn porous_on_rigid(material: Material, d: f64) -> Self {
        Self::new(vec![Box::new(PorousLayer::new(material, d))])
    }

    /// Porous layer of depth `d` whose exposed face is `total_depth` from
    /// the wall. No air layer is added when the depths are equal; a wall
    /// closer than `d` is an error.
    pub fn porous_with_air_gap(material: Material, d: f64, total_depth: f64) -> Result<Self> {
        let gap = backing_gap(d, total_depth)?;
        let mut layers: Vec<Box<dyn AcousticLayer>> = vec![Box::new(PorousLayer::new(material, d))];
        if gap > 0.0 {
            layers.push(Box::new(AirGap::new(gap)));
        }
        Ok(Self::new(layers))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Distance from the exposed face to the wall.
    pub fn total_depth(&self) -> f64 {
        self.layers.iter().map(|l| l.depth()).sum()
    }

    pub fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    /// Log range advisories for every layer over the given frequencies.
    pub fn check_range(&self, frequencies: &[f64], air: &AirProperties) {
        for layer in &self.layers {
            layer.check_range(frequencies, air);
        }
    }

    /// Surface impedance at the exposed face, folding the single-layer
    /// transfer from the wall outward.
    pub fn surface_impedance(&self, omega: f64, air: &AirProperties, thermo: &Thermodynamics) -> Backing {
        self.layers
            .iter()
            .rev()
            .fold(Backing::Rigid, |backing, layer| {
                layer.transfer_matrix(omega, air, thermo).input_impedance(backing)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyVector;
    use crate::impedance::{surface_impedance_air_gap, surface_impedance_rigid};
    use crate::porous::{delany_bazley, DelanyBazley};

    fn fibre() -> Material {
        Material::DelanyBazley(DelanyBazley { sigma: 10_000.0 })
    }

    #[test]
    fn test_stack_matches_rigid_formula() {
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let f = FrequencyVector::stepped(100.0, 5_000.0, 100.0).unwrap();
        let r = delany_bazley(&f, 10_000.0, air.c0, air.rho0).unwrap();
        let expected = surface_impedance_rigid(&r, 0.05).unwrap();

        let stack = LayerStack::porous_on_rigid(fibre(), 0.05);
        for (omega, zs) in f.angular().into_iter().zip(expected.iter()) {
            let got = stack.surface_impedance(omega, &air, &thermo).impedance();
            assert!((got - zs).norm() / zs.norm() < 1e-9, "{got} vs {zs}");
        }
    }

    #[test]
    fn test_stack_matches_air_gap_formula() {
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let f = FrequencyVector::stepped(100.0, 5_000.0, 100.0).unwrap();
        let r = delany_bazley(&f, 10_000.0, air.c0, air.rho0).unwrap();
        let expected = surface_impedance_air_gap(&r, 0.025, 0.1, &air, &f).unwrap();

        let stack = LayerStack::porous_with_air_gap(fibre(), 0.025, 0.1).unwrap();
        assert_eq!(stack.len(), 2);
        assert!((stack.total_depth() - 0.1).abs() < 1e-12);
        for (omega, zs) in f.angular().into_iter().zip(expected.iter()) {
            let got = stack.surface_impedance(omega, &air, &thermo).impedance();
            assert!((got - zs).norm() / zs.norm() < 1e-9, "{got} vs {zs}");
        }
    }

    #[test]
    fn test_folded_and_chained_agree() {
        let air = AirProperties::standard();
        let thermo = Thermodynamics::default();
        let stack = LayerStack::new(vec![
            Box::new(Panel::Perforated {
                hole_diameter: 5e-3,
                hole_spacing: 20e-3,
                thickness: 3e-3,
            }),
            Box::new(PorousLayer::new(fibre(), 0.025)),
            Box::new(AirGap::new(0.025)),
        ]);
        let omega = 2.0 * PI * 630.0;
        let folded = stack.surface_impedance(omega, &air, &thermo).impedance();
        let chained = stack
            .layers
            .iter()
            .fold(TransferMatrix::identity(), |total, layer| {
                total.chain(&layer.transfer_matrix(omega, &air, &thermo))
            })
            .input_impedance(Backing::Rigid)
            .impedance();
        assert!((folded - chained).norm() / folded.norm() < 1e-9, "{folded} vs {chained}");
    }

    #[test]
    fn test_empty_stack_is_the_wall() {
        let stack = LayerStack::new(Vec::new());
        let z = stack.surface_impedance(1000.0, &AirProperties::standard(), &Thermodynamics::default());
        assert_eq!(z, Backing::Rigid);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_air_gap_stack_rejects_wall_inside_layer() {
        let result = LayerStack::porous_with_air_gap(fibre(), 0.025, 0.010);
        assert!(
            matches!(
                result,
                Err(crate::error::AbsorberError::InvalidParameter { name: "total_depth", .. })
            ),
            "wall in front of the layer's back face must be rejected"
        );
        let flush = LayerStack::porous_with_air_gap(fibre(), 0.025, 0.025).unwrap();
        assert_eq!(flush.len(), 1);
    }

    #[test]
    fn test_validate_reports_bad_layer() {
        let stack = LayerStack::new(vec![
            Box::new(PorousLayer::new(fibre(), 0.05)),
            Box::new(AirGap::new(-0.01)),
        ]);
        assert!(stack.validate().is_err());
    }
}
