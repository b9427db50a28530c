//! # Shore Protection Manual Shallow-Water Growth
//!
//! Wave growth in finite depth following the Shore Protection Manual (1984),
//! chapter 3. Wind speed is first converted to the wind-stress factor
//! `Ua = 0.71 U^1.23` (U in m/s) which all equations below take as input.
//!
//! | Equation | Function |
//! |----------|----------|
//! | 3-33 | [`deep_fetch_limited`] |
//! | 3-35 | [`duration_limited`] (duration → equivalent fetch) |
//! | 3-36 | [`fully_developed_height`] |
//! | 3-38 | [`fully_developed_duration`] |
//! | 3-39 | [`shallow_height`] |
//! | 3-40 | [`shallow_period`] |
//!
//! The [`SpmShallowWater`] model never predicts a fetch-limited sea larger than the
//! deep-water Bretschneider grid allows for the same fetch.

use super::{
    whole_seconds, BretschneiderTables, GrowthModel, GRAVITY, KNOTS_TO_MPS, MIN_WIND_SPEED_KN,
    NM_TO_M,
};
use crate::fetch::DirectionalTable;
use std::f64::consts::PI;
use std::sync::Arc;

/// Shortest period (s) the shallow-water model reports under wind.
const MIN_PERIOD_S: f64 = 2.0;

/// Wind-stress factor `Ua` (m/s) for a 10 m wind speed in knots.
pub fn wind_stress_factor(speed_kn: f64) -> f64 {
    0.71 * (speed_kn * KNOTS_TO_MPS).powf(1.23)
}

/// Eq. 3-36: fully developed deep-water height (m).
pub fn fully_developed_height(ua: f64) -> f64 {
    ua.powi(2) * 0.2433 / GRAVITY
}

/// Eq. 3-38: duration (s) for seas to become fully developed.
pub fn fully_developed_duration(ua: f64) -> f64 {
    ua * 71500.0 / GRAVITY
}

/// Eq. 3-33: deep-water fetch-limited height (m), fetch in metres, capped at
/// the fully developed height.
pub fn deep_fetch_limited(ua: f64, fetch_m: f64) -> f64 {
    (0.0005112 * ua * fetch_m.max(0.0).sqrt()).min(fully_developed_height(ua))
}

/// Duration-limited height (m): the duration (s) is capped at the fully
/// developed duration, turned into an equivalent fetch with Eq. 3-35, and fed
/// through [`deep_fetch_limited`].
pub fn duration_limited(ua: f64, duration_s: f64) -> f64 {
    if ua <= 0.0 {
        return 0.0;
    }
    let duration_s = duration_s.max(0.0).min(fully_developed_duration(ua));
    let equivalent_fetch = ((GRAVITY * duration_s / ua) / 68.8).powf(1.5) * ua.powi(2) / GRAVITY;
    deep_fetch_limited(ua, equivalent_fetch)
}

/// Eq. 3-39: height (m) in water of `depth_m` over `fetch_m`.
pub fn shallow_height(ua: f64, fetch_m: f64, depth_m: f64) -> f64 {
    if ua <= 0.0 || fetch_m <= 0.0 || depth_m <= 0.0 {
        return 0.0;
    }
    let u2 = ua.powi(2);
    let depth_term = (0.530 * (GRAVITY * depth_m / u2).powf(0.75)).tanh();
    let fetch_term = 0.00565 * (GRAVITY * fetch_m / u2).sqrt();
    (u2 / GRAVITY) * 0.283 * depth_term * (fetch_term / depth_term).tanh()
}

/// Eq. 3-40: peak period (s) in water of `depth_m` over `fetch_m`.
pub fn shallow_period(ua: f64, fetch_m: f64, depth_m: f64) -> f64 {
    if ua <= 0.0 || fetch_m <= 0.0 || depth_m <= 0.0 {
        return 0.0;
    }
    let u2 = ua.powi(2);
    let depth_term = (0.833 * (GRAVITY * depth_m / u2).powf(3.0 / 8.0)).tanh();
    let fetch_term = 0.0379 * (GRAVITY * fetch_m / u2).powf(1.0 / 3.0);
    (ua / GRAVITY) * 7.54 * depth_term * (fetch_term / depth_term).tanh()
}

/// Shallow-water height for a wind (knots) blowing `duration_h` hours over
/// `fetch_nm` of water `depth_m` deep: the smaller of the duration-limited and
/// the Eq. 3-39 value.
pub fn seas_in_shallow_water(speed_kn: f64, duration_h: f64, fetch_nm: f64, depth_m: f64) -> f64 {
    let ua = wind_stress_factor(speed_kn);
    let by_duration = duration_limited(ua, duration_h * 3600.0);
    let by_fetch = shallow_height(ua, fetch_nm * NM_TO_M, depth_m);
    by_duration.min(by_fetch)
}

/// Finite-depth growth model using Eq. 3-39 for fetch-limited heights.
#[derive(Clone, Debug)]
pub struct SpmShallowWater {
    tables: Arc<BretschneiderTables>,
    fetch: DirectionalTable,
    depth: DirectionalTable,
    max_duration: f64,
}

impl SpmShallowWater {
    pub fn new(
        tables: Arc<BretschneiderTables>,
        fetch: DirectionalTable,
        depth: DirectionalTable,
        max_duration: f64,
    ) -> Self {
        SpmShallowWater {
            tables,
            fetch,
            depth,
            max_duration,
        }
    }

    /// Fetch (nm) and depth (m) for the bin nearest `direction_deg`.
    pub fn fetch_and_depth(&self, direction_deg: f64) -> (f64, f64) {
        (self.fetch.get(direction_deg), self.depth.get(direction_deg))
    }

    /// Peak period from wind alone: the deep-water Bretschneider wavelength
    /// travelling at the shallow-water wave speed, to the nearest second.
    pub fn period_from_wind(&self, speed_kn: f64, direction_deg: f64) -> f64 {
        let (_, depth) = self.fetch_and_depth(direction_deg);
        if depth <= 0.0 {
            return 0.0;
        }
        let speed = speed_kn * KNOTS_TO_MPS;
        let deep_period = 0.286 * speed.powi(2) / GRAVITY;
        let deep_length = GRAVITY * deep_period.powi(2) / (2.0 * PI);
        let shallow_speed = (GRAVITY * depth).sqrt();
        (deep_length / shallow_speed).round_ties_even()
    }
}

impl GrowthModel for SpmShallowWater {
    fn fetch_limited_height(&self, speed_kn: f64, direction_deg: f64) -> f64 {
        let (fetch, depth) = self.fetch_and_depth(direction_deg);
        let shallow = shallow_height(wind_stress_factor(speed_kn), fetch * NM_TO_M, depth);
        shallow.min(self.tables.height_from_fetch(speed_kn, fetch))
    }

    fn duration_limited_height(&self, speed_kn: f64, duration_h: f64) -> f64 {
        self.tables.height_from_duration(speed_kn, duration_h)
    }

    fn peak_period(&self, _height_m: f64, speed_kn: f64, direction_deg: f64) -> f64 {
        if speed_kn <= MIN_WIND_SPEED_KN {
            return 0.0;
        }
        let (fetch, depth) = self.fetch_and_depth(direction_deg);
        let period = shallow_period(wind_stress_factor(speed_kn), fetch * NM_TO_M, depth);
        whole_seconds(period.max(MIN_PERIOD_S))
    }

    fn max_duration(&self) -> f64 {
        self.max_duration
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tables;
    use super::super::MAX_DURATION_HOURS;
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model(fetch_nm: f64, depth_m: f64) -> SpmShallowWater {
        SpmShallowWater::new(
            tables(),
            DirectionalTable::uniform(fetch_nm),
            DirectionalTable::uniform(depth_m),
            MAX_DURATION_HOURS,
        )
    }

    // Worked example, SPM 1984 p. 3-66: Ua = 22 m/s, F = 24.4 km, d = 11 m
    #[test]
    fn shallow_equations_match_manual_example() {
        assert_abs_diff_eq!(shallow_height(22.0, 24_400.0, 11.0), 1.5, epsilon = 0.1);
        assert_abs_diff_eq!(shallow_period(22.0, 24_400.0, 11.0), 4.4, epsilon = 0.1);
    }

    // Worked examples, SPM 1984 p. 3-53
    #[test]
    fn deep_equations_match_manual_examples() {
        let ua = wind_stress_factor(45.7);
        assert_abs_diff_eq!(duration_limited(ua, 3.0 * 3600.0), 3.3, epsilon = 0.1);
        assert_abs_diff_eq!(deep_fetch_limited(ua, 5.4 * NM_TO_M), 1.75, epsilon = 0.1);
        assert_abs_diff_eq!(deep_fetch_limited(ua, 54.0 * NM_TO_M), 5.5, epsilon = 0.1);
    }

    #[test]
    fn duration_limited_caps_at_fully_developed() {
        let ua = wind_stress_factor(20.0);
        let developed = duration_limited(ua, fully_developed_duration(ua));
        assert_eq!(duration_limited(ua, 1.0e9), developed);
        assert!(developed <= fully_developed_height(ua) + 1e-12);
    }

    #[test]
    fn zero_inputs_give_calm_seas() {
        assert_eq!(shallow_height(0.0, 1000.0, 10.0), 0.0);
        assert_eq!(shallow_height(10.0, 0.0, 10.0), 0.0);
        assert_eq!(shallow_height(10.0, 1000.0, 0.0), 0.0);
        assert_eq!(duration_limited(0.0, 3600.0), 0.0);
    }

    #[test]
    fn shallow_water_is_capped_by_deep_grid() {
        let deep_limited = model(20.0, 500.0);
        let deep = tables().height_from_fetch(20.0, 20.0);
        assert!(deep_limited.fetch_limited_height(20.0, 0.0) <= deep + 1e-12);

        let shallow = model(20.0, 2.0);
        let h = shallow.fetch_limited_height(20.0, 0.0);
        let expected = shallow_height(wind_stress_factor(20.0), 20.0 * NM_TO_M, 2.0);
        assert!(h < deep);
        assert_abs_diff_eq!(h, expected, epsilon = 1e-12);
    }

    #[test]
    fn depth_reduces_height() {
        let deep = model(20.0, 30.0).fetch_limited_height(25.0, 0.0);
        let shallow = model(20.0, 3.0).fetch_limited_height(25.0, 0.0);
        assert!(shallow < deep);
    }

    #[test]
    fn combined_seas_take_the_smaller_limit() {
        let short = seas_in_shallow_water(22.0, 1.0, 50.0, 20.0);
        let long = seas_in_shallow_water(22.0, 24.0, 50.0, 20.0);
        assert!(short < long);
        let ua = wind_stress_factor(22.0);
        assert_abs_diff_eq!(long, shallow_height(ua, 50.0 * NM_TO_M, 20.0), epsilon = 1e-12);
    }

    #[test]
    fn peak_period_rules() {
        let model = model(20.0, 15.0);
        assert_eq!(model.peak_period(1.0, 0.1, 0.0), 0.0);
        let period = model.peak_period(1.0, 20.0, 0.0);
        assert_eq!(period, period.trunc());
        assert!(period >= MIN_PERIOD_S);
        assert_eq!(model.peak_period(0.1, 1.0, 0.0), MIN_PERIOD_S);
    }

    #[test]
    fn wind_only_period_grows_with_speed() {
        let model = model(20.0, 15.0);
        assert!(model.period_from_wind(30.0, 0.0) > model.period_from_wind(15.0, 0.0));
    }
}
