//! Deep-water Bretschneider growth from the site's fetch table.

use super::{whole_seconds, BretschneiderTables, GrowthModel, KNOTS_TO_MPS};
use crate::fetch::DirectionalTable;
use std::sync::Arc;

/// Pierson-Moskowitz coefficient relating peak period to wind speed (m/s).
const PM_PERIOD_PER_MPS: f64 = 0.87;

/// Deep water: heights from the Bretschneider fetch and duration grids.
#[derive(Clone, Debug)]
pub struct Bretschneider {
    tables: Arc<BretschneiderTables>,
    fetch: DirectionalTable,
    max_duration: f64,
}

impl Bretschneider {
    pub fn new(tables: Arc<BretschneiderTables>, fetch: DirectionalTable, max_duration: f64) -> Self {
        Bretschneider {
            tables,
            fetch,
            max_duration,
        }
    }

    /// Fetch (nm) for the bin nearest `direction_deg`.
    pub fn fetch_limit(&self, direction_deg: f64) -> f64 {
        self.fetch.get(direction_deg)
    }

    /// Peak period from wind speed alone, to hundredths of a second.
    pub fn period_from_wind(speed_kn: f64) -> f64 {
        let period = PM_PERIOD_PER_MPS * speed_kn * KNOTS_TO_MPS;
        (period * 100.0).round() / 100.0
    }
}

/// Peak period from significant wave height, `3.86 √Hs`, at least 1 s.
pub fn period_from_height(height_m: f64) -> f64 {
    whole_seconds((3.86 * height_m.max(0.0).sqrt()).max(1.0))
}

impl GrowthModel for Bretschneider {
    fn fetch_limited_height(&self, speed_kn: f64, direction_deg: f64) -> f64 {
        self.tables
            .height_from_fetch(speed_kn, self.fetch_limit(direction_deg))
    }

    fn duration_limited_height(&self, speed_kn: f64, duration_h: f64) -> f64 {
        self.tables.height_from_duration(speed_kn, duration_h)
    }

    fn peak_period(&self, height_m: f64, _speed_kn: f64, _direction_deg: f64) -> f64 {
        period_from_height(height_m)
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
    use crate::direction::BIN_COUNT;
    use approx::assert_abs_diff_eq;

    fn model_with_fetch(values: [f64; BIN_COUNT]) -> Bretschneider {
        Bretschneider::new(tables(), DirectionalTable::new(values), MAX_DURATION_HOURS)
    }

    #[test]
    fn fetch_limited_height_comes_from_grid() {
        let model = model_with_fetch([20.0; BIN_COUNT]);
        // 20 kn over 20 nm
        assert_abs_diff_eq!(model.fetch_limited_height(20.0, 90.0), 1.11, epsilon = 1e-9);
        // halfway between the 15 and 20 nm columns
        let model = model_with_fetch([17.5; BIN_COUNT]);
        assert_abs_diff_eq!(model.fetch_limited_height(20.0, 90.0), 1.055, epsilon = 1e-9);
    }

    #[test]
    fn fetch_is_read_from_wind_direction_bin() {
        let mut fetch = [1.0; BIN_COUNT];
        fetch[27] = 100.0;
        let model = model_with_fetch(fetch);
        assert!(model.fetch_limited_height(30.0, 272.0) > model.fetch_limited_height(30.0, 90.0));
        assert_eq!(model.fetch_limit(268.0), 100.0);
    }

    #[test]
    fn duration_limited_height_comes_from_grid() {
        let model = model_with_fetch([20.0; BIN_COUNT]);
        assert_abs_diff_eq!(model.duration_limited_height(20.0, 4.0), 1.09, epsilon = 1e-9);
        assert_abs_diff_eq!(model.duration_limited_height(20.0, 0.0), 0.0);
    }

    #[test]
    fn short_duration_limits_long_fetch() {
        let model = model_with_fetch([100.0; BIN_COUNT]);
        let h = model.height_from_fetch_and_duration(30.0, 0.0, 3.0);
        assert_abs_diff_eq!(h, 1.73, epsilon = 1e-9);
    }

    #[test]
    fn period_estimates() {
        assert_eq!(period_from_height(0.0), 1.0);
        assert_eq!(period_from_height(1.1), 4.0);
        assert_eq!(period_from_height(4.0), 7.0);
        assert_abs_diff_eq!(Bretschneider::period_from_wind(20.0), 8.95, epsilon = 1e-9);
    }
}
