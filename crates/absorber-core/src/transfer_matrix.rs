use num_complex::Complex64;

/// Impedance seen looking into whatever sits behind a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backing {
    /// Rigid, impervious wall (infinite impedance).
    Rigid,
    /// Finite specific acoustic impedance in Pa·s/m.
    Impedance(Complex64),
}

/// Stand-in for the infinite impedance of a rigid termination when a plain
/// complex value is required.
pub const RIGID_IMPEDANCE: Complex64 = Complex64::new(f64::INFINITY, 0.0);

impl Backing {
    /// Impedance as a complex number; a rigid wall maps to [`RIGID_IMPEDANCE`].
    pub fn impedance(&self) -> Complex64 {
        match self {
            Backing::Rigid => RIGID_IMPEDANCE,
            Backing::Impedance(z) => *z,
        }
    }
}

/// A 2×2 complex transfer matrix representing one layer of a treatment,
/// relating pressure and normal particle velocity on its two faces.
///
/// ```text
/// [p_front]   [a  b] [p_back]
/// [u_front] = [c  d] [u_back]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TransferMatrix {
    pub a: Complex64,
    pub b: Complex64,
    pub c: Complex64,
    pub d: Complex64,
}

impl TransferMatrix {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { a, b, c, d }
    }

    /// Identity matrix (zero-thickness layer).
    pub fn identity() -> Self {
        Self {
            a: Complex64::new(1.0, 0.0),
            b: Complex64::new(0.0, 0.0),
            c: Complex64::new(0.0, 0.0),
            d: Complex64::new(1.0, 0.0),
        }
    }

    /// Fluid layer of thickness `depth` with characteristic impedance `zc`
    /// and wavenumber `kc`.
    pub fn layer(zc: Complex64, kc: Complex64, depth: f64) -> Self {
        let kd = kc * depth;
        let cos_kd = kd.cos();
        let sin_kd = kd.sin();
        let j = Complex64::new(0.0, 1.0);

        Self::new(cos_kd, j * zc * sin_kd, j * sin_kd / zc, cos_kd)
    }

    /// Thin element whose only effect is a pressure drop `z` in series
    /// (panels, membranes, resistive screens).
    pub fn series(z: Complex64) -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            z,
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        )
    }

    /// Chain (multiply) this matrix with another: self · other.
    pub fn chain(&self, other: &TransferMatrix) -> TransferMatrix {
        TransferMatrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
        }
    }

    /// Impedance at the front face given the termination at the back face.
    ///
    /// Z_front = (a·Z_back + b) / (c·Z_back + d), which reduces to a/c on a
    /// rigid wall. When the relevant denominator is exactly zero the front
    /// face is itself rigid; otherwise IEEE inf/NaN from near-singular
    /// denominators propagate untouched.
    pub fn input_impedance(&self, backing: Backing) -> Backing {
        let zero = Complex64::new(0.0, 0.0);
        match backing {
            Backing::Rigid => {
                if self.c == zero {
                    Backing::Rigid
                } else {
                    Backing::Impedance(self.a / self.c)
                }
            }
            Backing::Impedance(z) => {
                let denom = self.c * z + self.d;
                if denom == zero {
                    Backing::Rigid
                } else {
                    Backing::Impedance((self.a * z + self.b) / denom)
                }
            }
        }
    }
}
