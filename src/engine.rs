//! # Directional Sea-State Engine
//!
//! Holds the sea as 36 significant-wave-height bins and advances it one wind step
//! at a time.
//!
//! ## Step Algorithm
//!
//! For a wind step `(direction, speed, hours)`:
//! 1. Every bin's current height is converted to the **equivalent duration** of the
//!    new wind: how long it would have had to blow to build that sea.
//! 2. Each bin covered by the active [`BinWeightProfile`] around the wind's bin is
//!    grown for its equivalent duration plus `hours`, with the wind speed scaled by
//!    the profile weight for that offset.
//! 3. The whole previous state is decayed bin by bin:
//!    `min(h × factor, 0.5 × factor)`, so seas under 0.5 m drop by a fixed
//!    amount rather than a fixed fraction.
//! 4. The new state is the bin-wise maximum of grown and decayed seas. Bins the
//!    wind does not reach simply decay.
//!
//! [`SeaEngine::step`] never mutates its input; it returns the next state, which
//! makes runs replayable from any intermediate state.
//!
//! ## Reporting
//!
//! A report takes the largest bin (never below 0.1 m), the unit-vector mean of
//! the directions holding that maximum, and optionally the growth model's peak
//! period for that height and direction.

use crate::decay::DecreaseFactors;
use crate::direction::{
    average_direction, bin_direction, bin_index, dir_index, BinWeightProfile, BIN_COUNT,
};
use crate::error::Result;
use crate::growth::GrowthModel;
use crate::sequencer::WindStep;
use crate::SeaReport;
use log::{log_enabled, trace, Level};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Hours of wind used to seed the bins from the first observation.
pub const INITIAL_DURATION_HOURS: f64 = 4.0;

/// Smallest height ever reported (m).
pub const MIN_REPORTED_HEIGHT_M: f64 = 0.1;

/// Reference height (m) below which decay removes a fixed amount.
const DECAY_REFERENCE_HEIGHT_M: f64 = 0.5;

/// Which fields a report carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputDetail {
    #[default]
    Height,
    HeightDirection,
    HeightPeriodDirection,
}

/// Significant wave height per 10° direction bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeaBins {
    heights: [f64; BIN_COUNT],
}

impl SeaBins {
    /// No sea in any direction.
    pub fn calm() -> Self {
        SeaBins {
            heights: [0.0; BIN_COUNT],
        }
    }

    pub fn from_heights(heights: [f64; BIN_COUNT]) -> Self {
        SeaBins { heights }
    }

    pub fn heights(&self) -> &[f64; BIN_COUNT] {
        &self.heights
    }

    pub fn at_bin(&self, index: usize) -> f64 {
        self.heights[index]
    }

    /// Largest height in any bin.
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(0.0, f64::max)
    }

    /// Directions of every bin holding exactly the maximum height.
    pub fn peak_directions(&self) -> Vec<f64> {
        let max = self.max_height();
        self.heights
            .iter()
            .enumerate()
            .filter(|(_, &h)| h == max)
            .map(|(i, _)| bin_direction(i))
            .collect()
    }
}

impl Default for SeaBins {
    fn default() -> Self {
        Self::calm()
    }
}

// serde stops at 32-element arrays; write the bins as a sequence.
impl Serialize for SeaBins {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SeaBins", 1)?;
        state.serialize_field("heights", self.heights.as_slice())?;
        state.end()
    }
}

/// Applies wind steps to [`SeaBins`] through a growth model.
pub struct SeaEngine {
    model: Box<dyn GrowthModel>,
    profile: BinWeightProfile,
    decrease: DecreaseFactors,
}

impl SeaEngine {
    pub fn new(model: Box<dyn GrowthModel>, profile: BinWeightProfile, decrease: DecreaseFactors) -> Self {
        SeaEngine {
            model,
            profile,
            decrease,
        }
    }

    pub fn model(&self) -> &dyn GrowthModel {
        self.model.as_ref()
    }

    pub fn decrease_factors(&self) -> &DecreaseFactors {
        &self.decrease
    }

    /// Seed bins around the wind by growing them for `duration_h` hours.
    pub fn init_from_duration(&self, direction_deg: f64, speed_kn: f64, duration_h: f64) -> SeaBins {
        let centre = dir_index(direction_deg);
        let mut heights = [0.0; BIN_COUNT];
        for (offset, weight) in self.profile.iter() {
            heights[bin_index(centre, offset)] =
                self.model
                    .height_from_fetch_and_duration(speed_kn * weight, direction_deg, duration_h);
        }
        SeaBins { heights }
    }

    /// Seed bins around the wind with a known starting height.
    pub fn init_from_height(&self, direction_deg: f64, starting_height_m: f64) -> SeaBins {
        let centre = dir_index(direction_deg);
        let mut heights = [0.0; BIN_COUNT];
        for (offset, weight) in self.profile.iter() {
            heights[bin_index(centre, offset)] = starting_height_m * weight;
        }
        SeaBins { heights }
    }

    /// Next state after `wind` has blown over `state`.
    pub fn step(&self, state: &SeaBins, wind: &WindStep) -> Result<SeaBins> {
        let mut equivalent = [0.0; BIN_COUNT];
        for (hours, &height) in equivalent.iter_mut().zip(state.heights.iter()) {
            *hours = self
                .model
                .equivalent_duration(height, wind.speed_kn, wind.direction_deg)?;
        }

        let centre = dir_index(wind.direction_deg);
        let mut grown = [0.0; BIN_COUNT];
        for (offset, weight) in self.profile.iter() {
            let i = bin_index(centre, offset);
            grown[i] = self.model.height_from_fetch_and_duration(
                wind.speed_kn * weight,
                wind.direction_deg,
                equivalent[i] + wind.duration_h,
            );
        }

        let decayed = self.decay(state);

        let mut heights = [0.0; BIN_COUNT];
        for (i, height) in heights.iter_mut().enumerate() {
            *height = grown[i].max(decayed.heights[i]);
        }

        if log_enabled!(Level::Trace) {
            trace!(
                "wind {:5.1}/{:4.1} kn for {:.1} h -> bins {:?}",
                wind.direction_deg,
                wind.speed_kn,
                wind.duration_h,
                heights.map(|h| (h * 100.0).round() / 100.0)
            );
        }

        Ok(SeaBins { heights })
    }

    /// Previous state with every bin decayed, as if no wind blew.
    pub fn decay(&self, state: &SeaBins) -> SeaBins {
        let mut heights = [0.0; BIN_COUNT];
        for (i, height) in heights.iter_mut().enumerate() {
            let factor = self.decrease.at_bin(i);
            *height = (state.heights[i] * factor).min(DECAY_REFERENCE_HEIGHT_M * factor);
        }
        SeaBins { heights }
    }

    /// Reduce `state` to a single report.
    ///
    /// `speed_kn` is the wind the period estimate is made for.
    pub fn report(&self, state: &SeaBins, speed_kn: f64, detail: OutputDetail) -> SeaReport {
        let height_m = state.max_height().max(MIN_REPORTED_HEIGHT_M);
        if detail == OutputDetail::Height {
            return SeaReport::height_only(height_m);
        }

        let direction_deg = peak_direction(state);
        let period_s = match detail {
            OutputDetail::HeightPeriodDirection => {
                Some(self.model.peak_period(height_m, speed_kn, direction_deg))
            }
            _ => None,
        };

        SeaReport {
            height_m,
            direction_deg: Some(direction_deg),
            period_s,
        }
    }
}

/// Mean direction of the maximum bins, rounded to whole degrees in [0, 360).
pub fn peak_direction(state: &SeaBins) -> f64 {
    let dirs = state.peak_directions();
    average_direction(&dirs, None).round_ties_even() % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::DirectionProfile;
    use crate::fetch::DirectionalTable;
    use crate::growth::test_support::tables;
    use crate::growth::{Bretschneider, MAX_DURATION_HOURS};
    use approx::assert_abs_diff_eq;

    fn engine(profile: DirectionProfile) -> SeaEngine {
        let model = Bretschneider::new(tables(), DirectionalTable::uniform(20.0), MAX_DURATION_HOURS);
        SeaEngine::new(Box::new(model), profile.weights(), DecreaseFactors::default())
    }

    fn wind(direction_deg: f64, speed_kn: f64, duration_h: f64) -> WindStep {
        WindStep {
            direction_deg,
            speed_kn,
            duration_h,
        }
    }

    #[test]
    fn init_from_duration_fills_profile_only() {
        let engine = engine(DirectionProfile::Narrow);
        let bins = engine.init_from_duration(90.0, 20.0, INITIAL_DURATION_HOURS);

        for i in 7..=11 {
            assert_abs_diff_eq!(bins.at_bin(i), 1.09, epsilon = 1e-9);
        }
        assert_eq!(bins.at_bin(6), 0.0);
        assert_eq!(bins.at_bin(12), 0.0);
    }

    #[test]
    fn wide_profile_weakens_side_bins() {
        let engine = engine(DirectionProfile::Wide);
        let bins = engine.init_from_duration(0.0, 20.0, INITIAL_DURATION_HOURS);

        assert!(bins.at_bin(0) > bins.at_bin(3));
        assert!(bins.at_bin(3) > bins.at_bin(6));
        assert_abs_diff_eq!(bins.at_bin(2), bins.at_bin(34), epsilon = 1e-12);
        assert!(bins.at_bin(8) > 0.0);
        assert_eq!(bins.at_bin(9), 0.0);
        assert_eq!(bins.at_bin(27), 0.0);
    }

    #[test]
    fn init_from_height_scales_by_weight() {
        let engine = engine(DirectionProfile::Wide);
        let bins = engine.init_from_height(180.0, 2.0);
        assert_abs_diff_eq!(bins.at_bin(18), 2.0);
        assert_abs_diff_eq!(bins.at_bin(21), 2.0 * 0.75, epsilon = 1e-12);
        assert_eq!(bins.at_bin(0), 0.0);
    }

    #[test]
    fn decay_rule_caps_small_seas() {
        let engine = engine(DirectionProfile::Narrow);
        let mut heights = [0.0; BIN_COUNT];
        heights[0] = 2.0;
        heights[1] = 0.3;
        heights[2] = 0.6;
        let decayed = engine.decay(&SeaBins::from_heights(heights));

        assert_abs_diff_eq!(decayed.at_bin(0), 0.35, epsilon = 1e-12);
        assert_abs_diff_eq!(decayed.at_bin(1), 0.21, epsilon = 1e-12);
        assert_abs_diff_eq!(decayed.at_bin(2), 0.35, epsilon = 1e-12);
        assert_eq!(decayed.at_bin(3), 0.0);
    }

    #[test]
    fn step_grows_under_steady_wind() {
        let engine = engine(DirectionProfile::Narrow);
        let start = engine.init_from_duration(90.0, 20.0, INITIAL_DURATION_HOURS);
        let next = engine.step(&start, &wind(90.0, 20.0, 3.0)).unwrap();

        assert!(next.at_bin(9) >= start.at_bin(9));
        assert!(next.at_bin(9) <= 1.11 + 1e-9);
    }

    #[test]
    fn step_does_not_touch_its_input() {
        let engine = engine(DirectionProfile::Wide);
        let start = engine.init_from_duration(90.0, 20.0, INITIAL_DURATION_HOURS);
        let copy = start;
        engine.step(&start, &wind(270.0, 30.0, 3.0)).unwrap();
        assert_eq!(start, copy);
    }

    #[test]
    fn bins_away_from_wind_only_decay() {
        let engine = engine(DirectionProfile::Narrow);
        let start = engine.init_from_duration(90.0, 20.0, INITIAL_DURATION_HOURS);
        let next = engine.step(&start, &wind(270.0, 15.0, 3.0)).unwrap();

        let expected = engine.decay(&start);
        for i in 7..=11 {
            assert_abs_diff_eq!(next.at_bin(i), expected.at_bin(i), epsilon = 1e-12);
        }
        assert!(next.at_bin(27) > 0.0);
    }

    #[test]
    fn grown_seas_never_drop_below_decayed_previous() {
        let engine = engine(DirectionProfile::Narrow);
        let start = SeaBins::from_heights([3.0; BIN_COUNT]);
        let next = engine.step(&start, &wind(0.0, 1.0, 3.0)).unwrap();
        for i in 0..BIN_COUNT {
            assert!(next.at_bin(i) >= 0.35 - 1e-12);
        }
    }

    #[test]
    fn report_floors_height_and_averages_tied_directions() {
        let engine = engine(DirectionProfile::Narrow);

        let calm = engine.report(&SeaBins::calm(), 0.0, OutputDetail::Height);
        assert_eq!(calm.height_m, MIN_REPORTED_HEIGHT_M);
        assert_eq!(calm.direction_deg, None);

        let mut heights = [0.2; BIN_COUNT];
        heights[35] = 1.5;
        heights[1] = 1.5;
        let report = engine.report(&SeaBins::from_heights(heights), 20.0, OutputDetail::HeightDirection);
        assert_eq!(report.height_m, 1.5);
        assert_eq!(report.direction_deg, Some(0.0));
        assert_eq!(report.period_s, None);
    }

    #[test]
    fn report_with_period_uses_model() {
        let engine = engine(DirectionProfile::Narrow);
        let mut heights = [0.0; BIN_COUNT];
        heights[9] = 1.1;
        let report = engine.report(
            &SeaBins::from_heights(heights),
            20.0,
            OutputDetail::HeightPeriodDirection,
        );
        assert_eq!(report.direction_deg, Some(90.0));
        assert_eq!(report.period_s, Some(4.0));
    }

    #[test]
    fn bins_serialize_as_a_list_of_heights() {
        let mut heights = [0.0; BIN_COUNT];
        heights[9] = 1.25;
        let json = serde_json::to_value(SeaBins::from_heights(heights)).unwrap();

        let listed = json["heights"].as_array().unwrap();
        assert_eq!(listed.len(), BIN_COUNT);
        assert_eq!(listed[9], 1.25);
        assert_eq!(listed[0], 0.0);
    }
}
