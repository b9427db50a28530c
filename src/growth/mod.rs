//! # Wind-Wave Growth Models
//!
//! A growth model answers four questions for a wind of a given speed from a given
//! direction: how big can the sea get with the available fetch, how big after a
//! given number of hours, how many hours would it take to reach a height already
//! present, and what peak period goes with a height.
//!
//! ## Variants
//!
//! | Model | Fetch-limited height | Extra inputs |
//! |-------|----------------------|--------------|
//! | [`Bretschneider`] | deep-water Bretschneider grid | fetch |
//! | [`SeaLimits`] | per-site height grid keyed by direction and speed | sea-limits table |
//! | [`SpmShallowWater`] | Shore Protection Manual Eq. 3-39, capped by deep water | fetch, depth |
//! | [`BreugemHolthuijsen`] | Breugem–Holthuijsen (2007), capped by deep water | fetch, depth |
//!
//! All four share the Bretschneider duration-height grid and the 36 hour maximum
//! duration, so the engine only ever talks to the [`GrowthModel`] trait.
//!
//! ## Units
//! Wind speed in knots, direction in degrees, duration in hours, fetch in nautical
//! miles, depth and height in metres, period in seconds.

pub mod bretschneider;
pub mod holthuijsen;
pub mod sea_limits;
pub mod spm;

pub use bretschneider::Bretschneider;
pub use holthuijsen::BreugemHolthuijsen;
pub use sea_limits::SeaLimits;
pub use spm::SpmShallowWater;

use crate::error::{Result, SeasError};
use crate::fetch::SiteData;
use crate::inverse::inverse;
use crate::lookup_table::LookupTable;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Longest duration (hours) a sea is grown for.
pub const MAX_DURATION_HOURS: f64 = 36.0;

/// Wind speed floor (knots) for height lookups.
pub const MIN_WIND_SPEED_KN: f64 = 0.1;

/// Heights below this (m) have no meaningful equivalent duration.
pub const MIN_EQUIVALENT_HEIGHT_M: f64 = 0.01;

pub const GRAVITY: f64 = 9.81;

pub const KNOTS_TO_MPS: f64 = 0.514444;

pub const NM_TO_M: f64 = 1852.0;

const BUNDLED_DURATIONS: &str = include_str!("../../data/bs_durations.csv");
const BUNDLED_FETCH_LIMITS: &str = include_str!("../../data/bs_fetch_limits.csv");

/// Common contract of every growth formulation.
///
/// Implementors provide the fetch-limited and duration-limited curves plus a
/// period estimate; the combined height and the duration inversion are shared.
pub trait GrowthModel: Send + Sync {
    /// Fully developed height for this fetch (and depth), ignoring duration.
    fn fetch_limited_height(&self, speed_kn: f64, direction_deg: f64) -> f64;

    /// Height after `duration_h` hours of wind, ignoring fetch.
    fn duration_limited_height(&self, speed_kn: f64, duration_h: f64) -> f64;

    /// Peak period (s) of a sea of `height_m` under this wind.
    fn peak_period(&self, height_m: f64, speed_kn: f64, direction_deg: f64) -> f64;

    /// Duration (hours) at which seas are treated as fully grown.
    fn max_duration(&self) -> f64 {
        MAX_DURATION_HOURS
    }

    /// Smaller of the fetch-limited and duration-limited heights.
    fn height_from_fetch_and_duration(&self, speed_kn: f64, direction_deg: f64, duration_h: f64) -> f64 {
        let speed_kn = speed_kn.max(MIN_WIND_SPEED_KN);
        let from_fetch = self.fetch_limited_height(speed_kn, direction_deg);
        let from_duration = self.duration_limited_height(speed_kn, duration_h);
        from_fetch.min(from_duration)
    }

    /// Hours of this wind that would have produced `height_m`.
    ///
    /// Returns 0 for heights under [`MIN_EQUIVALENT_HEIGHT_M`] and the maximum
    /// duration once the height reaches either the fetch-limited or the
    /// maximum-duration ceiling.
    fn equivalent_duration(&self, height_m: f64, speed_kn: f64, direction_deg: f64) -> Result<f64> {
        if height_m < MIN_EQUIVALENT_HEIGHT_M {
            return Ok(0.0);
        }

        let max_duration = self.max_duration();
        let from_fetch = self.fetch_limited_height(speed_kn, direction_deg);
        let from_max_duration = self.duration_limited_height(speed_kn, max_duration);
        if height_m >= from_fetch || height_m >= from_max_duration {
            return Ok(max_duration);
        }

        inverse(|hours| self.duration_limited_height(speed_kn, hours), height_m)
    }
}

/// Reference grids shared by every model: Bretschneider duration-height and
/// fetch-height curves, both keyed by wind speed (knots) in rows.
#[derive(Clone, Debug, PartialEq)]
pub struct BretschneiderTables {
    /// Columns are durations in hours
    pub durations: LookupTable,
    /// Columns are fetches in nautical miles
    pub fetch_limits: LookupTable,
}

impl BretschneiderTables {
    /// Grids compiled into the crate from `data/`.
    pub fn bundled() -> Result<Self> {
        Ok(BretschneiderTables {
            durations: LookupTable::from_csv_str("bs_durations.csv", BUNDLED_DURATIONS)?,
            fetch_limits: LookupTable::from_csv_str("bs_fetch_limits.csv", BUNDLED_FETCH_LIMITS)?,
        })
    }

    /// Grids read from disk.
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(durations: P, fetch_limits: Q) -> Result<Self> {
        Ok(BretschneiderTables {
            durations: LookupTable::from_path(durations)?,
            fetch_limits: LookupTable::from_path(fetch_limits)?,
        })
    }

    /// Duration-limited height from the shared grid.
    pub fn height_from_duration(&self, speed_kn: f64, duration_h: f64) -> f64 {
        self.durations.interpolate(speed_kn, duration_h)
    }

    /// Deep-water fetch-limited height from the shared grid.
    pub fn height_from_fetch(&self, speed_kn: f64, fetch_nm: f64) -> f64 {
        self.fetch_limits.interpolate(speed_kn, fetch_nm)
    }
}

/// Selects which growth formulation a run uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModelKind {
    /// Deep-water Bretschneider from the site's fetch table
    #[default]
    #[serde(alias = "bretschneider")]
    Deep,
    /// Deep-water Bretschneider with heights from a per-site sea-limits table
    Mixed,
    /// Shore Protection Manual shallow water
    Shallow,
    /// Breugem–Holthuijsen shallow water
    Holthuijsen,
}

impl FromStr for GrowthModelKind {
    type Err = SeasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deep" | "bretschneider" => Ok(GrowthModelKind::Deep),
            "mixed" => Ok(GrowthModelKind::Mixed),
            "shallow" => Ok(GrowthModelKind::Shallow),
            "holthuijsen" => Ok(GrowthModelKind::Holthuijsen),
            other => Err(SeasError::invalid(format!("unknown growth model '{other}'"))),
        }
    }
}

/// Build the model selected by `kind` for one site.
///
/// `site` must already carry the fetch table the run should use (smoothed or
/// not); `sea_limits` is required for [`GrowthModelKind::Mixed`] only.
pub fn build_growth_model(
    kind: GrowthModelKind,
    site: &SiteData,
    tables: Arc<BretschneiderTables>,
    sea_limits: Option<Arc<LookupTable>>,
    max_duration: f64,
) -> Result<Box<dyn GrowthModel>> {
    info!("Using {kind:?} growth model");
    let model: Box<dyn GrowthModel> = match kind {
        GrowthModelKind::Deep => Box::new(Bretschneider::new(tables, site.fetch, max_duration)),
        GrowthModelKind::Mixed => {
            let limits = sea_limits.ok_or_else(|| {
                SeasError::invalid("mixed growth model needs a sea-limits table")
            })?;
            Box::new(SeaLimits::new(tables, limits, max_duration))
        }
        GrowthModelKind::Shallow => Box::new(SpmShallowWater::new(
            tables,
            site.fetch,
            site.depth,
            max_duration,
        )),
        GrowthModelKind::Holthuijsen => Box::new(BreugemHolthuijsen::new(
            tables,
            site.fetch,
            site.depth,
            max_duration,
        )),
    };
    Ok(model)
}

/// Period rounded to hundredths then truncated to whole seconds.
pub(crate) fn whole_seconds(period: f64) -> f64 {
    ((period * 100.0).round() / 100.0).trunc()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::OnceLock;

    pub fn tables() -> Arc<BretschneiderTables> {
        static TABLES: OnceLock<Arc<BretschneiderTables>> = OnceLock::new();
        TABLES
            .get_or_init(|| Arc::new(BretschneiderTables::bundled().unwrap()))
            .clone()
    }
}
