//! # Decrease Factors
//!
//! Seas no longer driven by the wind lose energy every step. Each direction bin
//! has a multiplicative factor applied to its unforced height: either a constant
//! (0.7), or a value read off a fetch-to-decay curve so that bins facing long
//! open-water fetches keep their swell longer.
//!
//! The curve's breakpoints were tuned by comparing runs against observations and
//! are carried as data, not as a formula.

use crate::direction::BIN_COUNT;
use crate::error::{Result, SeasError};
use crate::fetch::DirectionalTable;
use serde::{Deserialize, Serialize};

/// Decay applied every step when factors do not vary by direction.
pub const CONSTANT_DECREASE_FACTOR: f64 = 0.7;

/// Piecewise-linear fetch (nm) to decay-factor curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecayCurve {
    breakpoints: Vec<[f64; 2]>,
}

impl Default for DecayCurve {
    fn default() -> Self {
        DecayCurve {
            breakpoints: vec![[0.0, 0.7], [25.0, 0.7], [100.0, 0.9], [300.0, 0.9]],
        }
    }
}

impl DecayCurve {
    /// Curve through `(fetch, factor)` points; fetches must be strictly ascending.
    pub fn new(breakpoints: Vec<[f64; 2]>) -> Result<Self> {
        let curve = DecayCurve { breakpoints };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<()> {
        if self.breakpoints.len() < 2 {
            return Err(SeasError::invalid("decay curve needs at least two breakpoints"));
        }
        if !self.breakpoints.windows(2).all(|w| w[0][0] < w[1][0]) {
            return Err(SeasError::invalid(
                "decay curve fetches must be strictly ascending",
            ));
        }
        if self
            .breakpoints
            .iter()
            .any(|[_, factor]| !(0.0..=1.0).contains(factor))
        {
            return Err(SeasError::invalid("decay factors must lie in [0, 1]"));
        }
        Ok(())
    }

    /// Factor for `fetch_nm`, held flat outside the breakpoint range.
    pub fn factor(&self, fetch_nm: f64) -> f64 {
        let first = self.breakpoints[0];
        let last = self.breakpoints[self.breakpoints.len() - 1];
        if fetch_nm <= first[0] {
            return first[1];
        }
        if fetch_nm >= last[0] {
            return last[1];
        }
        self.breakpoints
            .windows(2)
            .find(|w| fetch_nm <= w[1][0])
            .map(|w| {
                let [x0, y0] = w[0];
                let [x1, y1] = w[1];
                y0 + (y1 - y0) * (fetch_nm - x0) / (x1 - x0)
            })
            .unwrap_or(last[1])
    }
}

/// One multiplicative decay factor per direction bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecreaseFactors {
    factors: [f64; BIN_COUNT],
}

impl DecreaseFactors {
    /// Same factor for every bin.
    pub fn constant(factor: f64) -> Self {
        DecreaseFactors {
            factors: [factor; BIN_COUNT],
        }
    }

    /// Factor per bin read from `curve` at that bin's decay fetch.
    pub fn varying(curve: &DecayCurve, decay_fetch: &DirectionalTable) -> Self {
        let mut factors = [0.0; BIN_COUNT];
        for (i, factor) in factors.iter_mut().enumerate() {
            *factor = curve.factor(decay_fetch.at_bin(i));
        }
        DecreaseFactors { factors }
    }

    pub fn at_bin(&self, index: usize) -> f64 {
        self.factors[index]
    }

    pub fn as_array(&self) -> &[f64; BIN_COUNT] {
        &self.factors
    }
}

impl Default for DecreaseFactors {
    fn default() -> Self {
        Self::constant(CONSTANT_DECREASE_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_curve_breakpoints() {
        let curve = DecayCurve::default();
        assert_abs_diff_eq!(curve.factor(0.0), 0.7);
        assert_abs_diff_eq!(curve.factor(10.0), 0.7);
        assert_abs_diff_eq!(curve.factor(25.0), 0.7);
        assert_abs_diff_eq!(curve.factor(62.5), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.factor(100.0), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.factor(250.0), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.factor(5000.0), 0.9);
    }

    #[test]
    fn rejects_bad_curves() {
        assert!(DecayCurve::new(vec![[0.0, 0.7]]).is_err());
        assert!(DecayCurve::new(vec![[10.0, 0.7], [5.0, 0.8]]).is_err());
        assert!(DecayCurve::new(vec![[0.0, 0.7], [5.0, 1.8]]).is_err());
        assert!(DecayCurve::new(vec![[0.0, 0.5], [50.0, 0.95]]).is_ok());
    }

    #[test]
    fn varying_factors_follow_fetch() {
        let mut fetch = [10.0; BIN_COUNT];
        fetch[9] = 100.0;
        fetch[27] = 62.5;
        let factors = DecreaseFactors::varying(&DecayCurve::default(), &DirectionalTable::new(fetch));

        assert_abs_diff_eq!(factors.at_bin(0), 0.7);
        assert_abs_diff_eq!(factors.at_bin(9), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(factors.at_bin(27), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn default_factors_are_constant() {
        let factors = DecreaseFactors::default();
        assert!(factors.as_array().iter().all(|&f| f == CONSTANT_DECREASE_FACTOR));
    }
}
