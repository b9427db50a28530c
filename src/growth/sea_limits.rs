//! Deep-water growth with fetch-limited heights read straight from a per-site
//! sea-limits grid (rows: wind direction in degrees, columns: wind speed in knots).

use super::bretschneider::period_from_height;
use super::{BretschneiderTables, GrowthModel};
use crate::lookup_table::LookupTable;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct SeaLimits {
    tables: Arc<BretschneiderTables>,
    limits: Arc<LookupTable>,
    max_duration: f64,
}

impl SeaLimits {
    pub fn new(tables: Arc<BretschneiderTables>, limits: Arc<LookupTable>, max_duration: f64) -> Self {
        SeaLimits {
            tables,
            limits,
            max_duration,
        }
    }
}

impl GrowthModel for SeaLimits {
    fn fetch_limited_height(&self, speed_kn: f64, direction_deg: f64) -> f64 {
        self.limits.interpolate(direction_deg, speed_kn)
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
    use approx::assert_abs_diff_eq;

    const LIMITS: &str = "\
dir/knots,0,10,20,30
0,0,0.3,0.6,0.9
180,0,0.5,1.5,2.5
350,0,0.3,0.6,0.9
";

    fn model() -> SeaLimits {
        let limits = LookupTable::from_csv_str("limits", LIMITS).unwrap();
        SeaLimits::new(tables(), Arc::new(limits), MAX_DURATION_HOURS)
    }

    #[test]
    fn heights_come_from_direction_and_speed() {
        let model = model();
        assert_abs_diff_eq!(model.fetch_limited_height(20.0, 180.0), 1.5, epsilon = 1e-12);
        // halfway between the 0 and 180 rows, halfway between 20 and 30 kn
        assert_abs_diff_eq!(model.fetch_limited_height(25.0, 90.0), 1.375, epsilon = 1e-12);
    }

    #[test]
    fn duration_still_limits_growth() {
        let model = model();
        let h = model.height_from_fetch_and_duration(30.0, 180.0, 1.0);
        assert_abs_diff_eq!(h, 0.96, epsilon = 1e-12);
        assert_eq!(model.equivalent_duration(2.5, 30.0, 180.0).unwrap(), MAX_DURATION_HOURS);
    }
}
