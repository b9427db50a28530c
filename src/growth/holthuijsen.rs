//! # Breugem–Holthuijsen Shallow-Water Growth
//!
//! Generalised shallow-water growth after Breugem and Holthuijsen (2007),
//! "Generalized shallow water wave growth from Lake George", with the period
//! relation from Holthuijsen (2007), "Waves in Oceanic and Coastal Waters".
//!
//! Wind speed is used directly in m/s (no wind-stress transform). With
//! `d̃ = gD/V²` and `F̃ = gF/V²` (F in metres):
//!
//! ```text
//! H = Hmax · (dH · tanh(fH / dH))^0.572   Hmax = 0.2433 V²/g
//!     dH = tanh(0.343 d̃^1.14)            fH = tanh(0.000414 F̃^0.79)
//!
//! T = Tmax · (dT · tanh(fT / dT))^0.18    Tmax = 7.69 V/g
//!     dT = tanh(0.1 d̃^2.01)              fT = tanh(2.77e-7 F̃^1.45)
//! ```
//!
//! The fetch term is scaled by the depth term, so shallow water saturates
//! growth early without ever making a stronger wind build a smaller sea.
//!
//! As with the SPM model, fetch-limited heights are capped by the deep-water
//! Bretschneider grid.

use super::{BretschneiderTables, GrowthModel, GRAVITY, KNOTS_TO_MPS, NM_TO_M};
use crate::fetch::DirectionalTable;
use std::sync::Arc;

/// Wind speed floor (m/s) for the period terms.
const MIN_PERIOD_SPEED_MPS: f64 = 0.0001;

/// Exponent on the combined depth and fetch term for height.
const HEIGHT_EXPONENT: f64 = 0.572;

/// Exponent on the combined depth and fetch term for period.
const PERIOD_EXPONENT: f64 = 0.18;

/// Fully developed height (m) for wind speed `v` (m/s).
pub fn fully_developed_height(v: f64) -> f64 {
    0.2433 * v.powi(2) / GRAVITY
}

/// Fully developed peak period (s) for wind speed `v` (m/s).
pub fn fully_developed_period(v: f64) -> f64 {
    7.69 * v.abs() / GRAVITY
}

/// Height (m) for wind `v` (m/s) over `fetch_m` of water `depth_m` deep.
pub fn wave_height(v: f64, fetch_m: f64, depth_m: f64) -> f64 {
    if v <= 0.0 || depth_m <= 0.0 {
        return 0.0;
    }
    let v2 = v.powi(2);
    let depth_term = (0.343 * (GRAVITY * depth_m / v2).powf(1.14)).tanh();
    let fetch_term = (0.000414 * (GRAVITY * fetch_m / v2).powf(0.79)).tanh();
    fully_developed_height(v) * (depth_term * (fetch_term / depth_term).tanh()).powf(HEIGHT_EXPONENT)
}

/// Peak period (s) for wind `v` (m/s) over `fetch_m` of water `depth_m` deep.
pub fn wave_period(v: f64, fetch_m: f64, depth_m: f64) -> f64 {
    let v = v.max(MIN_PERIOD_SPEED_MPS);
    let v2 = v.powi(2);
    let depth_term = (0.1 * (GRAVITY * depth_m / v2).powf(2.01)).tanh();
    let fetch_term = (0.000000277 * (GRAVITY * fetch_m / v2).powf(1.45)).tanh();
    if depth_term <= 0.0 {
        return 0.0;
    }
    fully_developed_period(v) * (depth_term * (fetch_term / depth_term).tanh()).powf(PERIOD_EXPONENT)
}

#[derive(Clone, Debug)]
pub struct BreugemHolthuijsen {
    tables: Arc<BretschneiderTables>,
    fetch: DirectionalTable,
    depth: DirectionalTable,
    max_duration: f64,
}

impl BreugemHolthuijsen {
    pub fn new(
        tables: Arc<BretschneiderTables>,
        fetch: DirectionalTable,
        depth: DirectionalTable,
        max_duration: f64,
    ) -> Self {
        BreugemHolthuijsen {
            tables,
            fetch,
            depth,
            max_duration,
        }
    }

    pub fn fetch_and_depth(&self, direction_deg: f64) -> (f64, f64) {
        (self.fetch.get(direction_deg), self.depth.get(direction_deg))
    }
}

impl GrowthModel for BreugemHolthuijsen {
    fn fetch_limited_height(&self, speed_kn: f64, direction_deg: f64) -> f64 {
        let (fetch, depth) = self.fetch_and_depth(direction_deg);
        let shallow = wave_height(speed_kn * KNOTS_TO_MPS, fetch * NM_TO_M, depth);
        shallow.min(self.tables.height_from_fetch(speed_kn, fetch))
    }

    fn duration_limited_height(&self, speed_kn: f64, duration_h: f64) -> f64 {
        self.tables.height_from_duration(speed_kn, duration_h)
    }

    fn peak_period(&self, _height_m: f64, speed_kn: f64, direction_deg: f64) -> f64 {
        let (fetch, depth) = self.fetch_and_depth(direction_deg);
        let period = wave_period(speed_kn * KNOTS_TO_MPS, fetch * NM_TO_M, depth);
        (period * 100.0).round() / 100.0
    }

    fn max_duration(&self) -> f64 {
        self.max_duration
    }
}
