//! # Inverse Solver
//!
//! Inverts a monotonically non-decreasing function over the non-negative reals.
//! Used to turn "height already in a bin" back into "hours of wind that would
//! have produced it" by inverting the duration-height curve.
//!
//! The search runs in two phases:
//! 1. **Bracket**: starting at `x = 1`, double `x` until `f(x) >= y`. The bracket is
//!    `[x/2, x]`, or `[0, 1]` when the first guess already reaches the target.
//! 2. **Bisect**: narrow the bracket, stepping each bound past the midpoint by
//!    `delta` so the loop always terminates. If the target is never hit exactly the
//!    bound whose value lies closer to `y` is returned.
//!
//! The bracket phase is capped at [`MAX_DOUBLINGS`]; a curve that never reaches the
//! target fails with [`SeasError::RootFinding`] instead of looping forever.

use crate::error::{Result, SeasError};
use log::warn;

/// Default bisection step and tolerance.
pub const DEFAULT_DELTA: f64 = 1e-4;

/// Doublings allowed while bracketing (2^64 covers any physical duration).
pub const MAX_DOUBLINGS: usize = 64;

/// Find `x >= 0` with `f(x) ≈ y` using the default tolerance.
pub fn inverse<F>(f: F, y: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    inverse_with_delta(f, y, DEFAULT_DELTA)
}

/// Find `x >= 0` with `f(x) ≈ y` to within `delta`.
pub fn inverse_with_delta<F>(f: F, y: f64, delta: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = find_bounds(&f, y)?;
    Ok(binary_search(&f, y, lo, hi, delta))
}

fn find_bounds<F>(f: &F, y: f64) -> Result<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut x = 1.0;
    let mut doublings = 0;
    // NaN targets never compare true, so they also end up at the cap
    while !(f(x) >= y) {
        if doublings == MAX_DOUBLINGS {
            warn!("Inverse solver could not bracket target {y} (last guess x = {x})");
            return Err(SeasError::RootFinding {
                target: y,
                iterations: doublings,
            });
        }
        x *= 2.0;
        doublings += 1;
    }
    let lo = if doublings == 0 { 0.0 } else { x / 2.0 };
    Ok((lo, x))
}

fn binary_search<F>(f: &F, y: f64, mut lo: f64, mut hi: f64, delta: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    while lo <= hi {
        let x = (lo + hi) / 2.0;
        let fx = f(x);
        if fx < y {
            lo = x + delta;
        } else if fx > y {
            hi = x - delta;
        } else {
            return x;
        }
    }
    if f(hi) - y < y - f(lo) {
        hi
    } else {
        lo
    }
}
