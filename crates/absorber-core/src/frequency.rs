use crate::error::{require_positive, AbsorberError, Result};
use std::f64::consts::PI;

/// Ordered set of analysis frequencies in Hz. Every entry is finite and
/// strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyVector {
    values: Vec<f64>,
}

/// Upper bound on the number of bins a generated grid may hold.
pub const MAX_BINS: usize = 10_000_000;

impl FrequencyVector {
    /// Accepts finite, strictly positive, strictly increasing values.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(AbsorberError::InvalidParameter {
                name: "frequencies",
                value: 0.0,
                reason: "frequency vector must not be empty",
            });
        }
        for &f in &values {
            require_positive("frequency", f)?;
        }
        if let Some(pair) = values.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AbsorberError::InvalidParameter {
                name: "frequencies",
                value: pair[1],
                reason: "frequencies must be strictly increasing",
            });
        }
        Ok(Self { values })
    }

    /// `n` points linearly spaced from `start` to `stop` inclusive. A single
    /// point is only accepted when `start == stop`.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Result<Self> {
        check_range(start, stop)?;
        check_bin_count("points", n as f64)?;
        match n {
            0 => Err(AbsorberError::InvalidParameter {
                name: "points",
                value: 0.0,
                reason: "at least one point is required",
            }),
            1 if start == stop => Self::new(vec![start]),
            1 => Err(AbsorberError::InvalidParameter {
                name: "points",
                value: 1.0,
                reason: "a single point cannot span start..stop",
            }),
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                Self::new((0..n).map(|i| start + i as f64 * step).collect())
            }
        }
    }

    /// Frequencies `start, start + step, ...` up to and including `stop`
    /// when it lands on a step.
    pub fn stepped(start: f64, stop: f64, step: f64) -> Result<Self> {
        check_range(start, stop)?;
        require_positive("step", step)?;
        // Small tolerance so that e.g. 100..=10000 step 1 keeps 10000.
        let intervals = ((stop - start) / step + 1e-9).floor();
        check_bin_count("step", intervals + 1.0)?;
        let count = (intervals as usize)
            .checked_add(1)
            .ok_or(AbsorberError::InvalidParameter {
                name: "step",
                value: step,
                reason: "step too small for the frequency range",
            })?;
        Self::new((0..count).map(|i| start + i as f64 * step).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Angular frequencies ω = 2πf.
    pub fn angular(&self) -> Vec<f64> {
        self.values.iter().map(|&f| 2.0 * PI * f).collect()
    }

    pub fn first(&self) -> f64 {
        self.values[0]
    }

    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }
}

impl AsRef<[f64]> for FrequencyVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

fn check_range(start: f64, stop: f64) -> Result<()> {
    require_positive("start", start)?;
    require_positive("stop", stop)?;
    if stop < start {
        return Err(AbsorberError::InvalidParameter {
            name: "stop",
            value: stop,
            reason: "must not be below start",
        });
    }
    Ok(())
}

fn check_bin_count(name: &'static str, count: f64) -> Result<()> {
    if !count.is_finite() || count > MAX_BINS as f64 {
        return Err(AbsorberError::InvalidParameter {
            name,
            value: count,
            reason: "grid would exceed MAX_BINS frequency bins",
        });
    }
    Ok(())
}
