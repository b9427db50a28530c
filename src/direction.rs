//! # Directional Bins
//!
//! The sea state is discretised into 36 bins of 10°, bin `i` covering the
//! direction `i * 10`. This module holds the circular arithmetic shared by the
//! engine and the wind sequencer, plus the bin-weight profiles that decide how
//! far a single wind direction spreads across neighbouring bins.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of directional bins.
pub const BIN_COUNT: usize = 36;

/// Width of one bin in degrees.
pub const BIN_WIDTH_DEG: f64 = 10.0;

/// Bin holding `direction_deg`, rounding to the nearest 10° (ties to even).
pub fn dir_index(direction_deg: f64) -> usize {
    let steps = (direction_deg / BIN_WIDTH_DEG).round_ties_even() as i64;
    steps.rem_euclid(BIN_COUNT as i64) as usize
}

/// Bin `offset` steps away from `index`, wrapping around the compass.
pub fn bin_index(index: usize, offset: i32) -> usize {
    (index as i64 + offset as i64).rem_euclid(BIN_COUNT as i64) as usize
}

/// Direction in degrees at the centre of bin `index`.
pub fn bin_direction(index: usize) -> f64 {
    index as f64 * BIN_WIDTH_DEG
}

/// Smallest angle between two directions, in [0, 180].
pub fn direction_diff(d1: f64, d2: f64) -> f64 {
    let diff = (d1 - d2).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// Mean of directions as unit vectors, normalised to [0, 360).
///
/// `weights` pairs with `dirs` element by element; directions beyond the end
/// of `weights` are ignored. When `None` every direction counts equally. An
/// empty `dirs` averages to 0.
pub fn average_direction(dirs: &[f64], weights: Option<&[f64]>) -> f64 {
    if dirs.is_empty() {
        return 0.0;
    }
    let equal = 1.0 / dirs.len() as f64;

    let (u, v) = dirs
        .iter()
        .enumerate()
        .filter_map(|(i, d)| match weights {
            Some(w) => w.get(i).map(|&w| (d, w)),
            None => Some((d, equal)),
        })
        .fold((0.0, 0.0), |(u, v), (d, w)| {
            let rad = d * PI / 180.0;
            (u + w * rad.sin(), v + w * rad.cos())
        });

    let mut avg = u.atan2(v) * 180.0 / PI;
    if avg < 0.0 {
        avg += 360.0;
    }
    if avg >= 360.0 {
        avg -= 360.0;
    }
    avg
}

/// Which bin-weight profile a run spreads wind energy with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionProfile {
    /// ±8 bins, wind speed scaled by cos²(offset × 10°)
    #[default]
    Wide,
    /// ±2 bins, full wind speed in each
    Narrow,
}

impl DirectionProfile {
    /// Build the bin offsets and weights for this profile.
    pub fn weights(self) -> BinWeightProfile {
        match self {
            DirectionProfile::Wide => BinWeightProfile::cos_squared(8),
            DirectionProfile::Narrow => BinWeightProfile::uniform(2),
        }
    }
}

/// Bin offsets from the wind's bin paired with speed attenuation factors.
#[derive(Clone, Debug, PartialEq)]
pub struct BinWeightProfile {
    entries: Vec<(i32, f64)>,
}

impl BinWeightProfile {
    /// Offsets `-half..=half` weighted by cos² of the offset angle.
    pub fn cos_squared(half: i32) -> Self {
        let entries = (-half..=half)
            .map(|offset| {
                let angle = (offset as f64 * BIN_WIDTH_DEG).to_radians();
                (offset, angle.cos().powi(2))
            })
            .collect();
        BinWeightProfile { entries }
    }

    /// Offsets `-half..=half`, all weighted 1.0.
    pub fn uniform(half: i32) -> Self {
        let entries = (-half..=half).map(|offset| (offset, 1.0)).collect();
        BinWeightProfile { entries }
    }

    /// (offset, weight) pairs in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bin_index_wraps_both_ways() {
        assert_eq!(bin_index(35, 3), 2);
        assert_eq!(bin_index(0, -3), 33);
        assert_eq!(bin_index(18, 0), 18);
        assert_eq!(bin_index(4, -8), 32);
    }

    #[test]
    fn dir_index_rounds_to_nearest_bin() {
        assert_eq!(dir_index(0.0), 0);
        assert_eq!(dir_index(94.0), 9);
        assert_eq!(dir_index(96.0), 10);
        assert_eq!(dir_index(356.0), 0);
        assert_eq!(dir_index(359.9), 0);
        // ties go to the even step
        assert_eq!(dir_index(25.0), 2);
        assert_eq!(dir_index(35.0), 4);
    }

    #[test]
    fn direction_diff_takes_short_way_round() {
        assert_abs_diff_eq!(direction_diff(10.0, 250.0), 120.0);
        assert_abs_diff_eq!(direction_diff(350.0, 10.0), 20.0);
        assert_abs_diff_eq!(direction_diff(90.0, 270.0), 180.0);
        assert_abs_diff_eq!(direction_diff(45.0, 45.0), 0.0);
    }

    #[test]
    fn average_direction_handles_north_wrap() {
        let avg = average_direction(&[350.0, 10.0], None);
        assert!(avg < 1e-9 || (360.0 - avg) < 1e-9, "got {avg}");

        let avg = average_direction(&[80.0, 100.0], None);
        assert_abs_diff_eq!(avg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn weighted_average_leans_towards_heavier_direction() {
        let avg = average_direction(&[180.0, 90.0], Some(&[0.75, 0.25]));
        assert!(avg > 135.0 && avg < 180.0, "got {avg}");
    }

    #[test]
    fn average_tolerates_short_weights_and_no_directions() {
        assert_eq!(average_direction(&[], None), 0.0);
        assert_eq!(average_direction(&[], Some(&[1.0])), 0.0);

        let avg = average_direction(&[90.0, 180.0, 270.0], Some(&[1.0]));
        assert_abs_diff_eq!(avg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn average_is_normalised_to_compass_range() {
        let avg = average_direction(&[270.0, 300.0], None);
        assert_abs_diff_eq!(avg, 285.0, epsilon = 1e-9);
    }

    #[test]
    fn wide_profile_is_cos_squared() {
        let profile = DirectionProfile::Wide.weights();
        assert_eq!(profile.len(), 17);
        let weights: Vec<_> = profile.iter().collect();
        assert_eq!(weights[8], (0, 1.0));
        assert_abs_diff_eq!(weights[11].1, 30f64.to_radians().cos().powi(2), epsilon = 1e-12);
        assert_abs_diff_eq!(weights[0].1, weights[16].1, epsilon = 1e-12);
    }

    #[test]
    fn narrow_profile_is_uniform() {
        let profile = DirectionProfile::Narrow.weights();
        let offsets: Vec<_> = profile.iter().map(|(o, _)| o).collect();
        assert_eq!(offsets, vec![-2, -1, 0, 1, 2]);
        assert!(profile.iter().all(|(_, w)| w == 1.0));
    }
}
