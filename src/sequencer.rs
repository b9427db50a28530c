//! # Wind Sequencer
//!
//! Turns the raw observation series into the effective wind steps the engine
//! consumes. Each step after the first looks back one observation:
//!
//! - a shift of 40° or more is taken as a real change of wind, so the new
//!   observation is used as-is for half its duration;
//! - anything smaller is smoothed: direction and speed are blended with the
//!   previous observation, leaning harder on the new value when the wind is rising.

use crate::direction::{average_direction, direction_diff};
use crate::error::{Result, SeasError};
use crate::WindObservation;
use serde::{Deserialize, Serialize};

/// Step length (hours) for observations without an explicit duration.
pub const DEFAULT_STEP_HOURS: f64 = 3.0;

/// Direction change (degrees) treated as a wind shift rather than a wobble.
pub const WIND_SHIFT_DEG: f64 = 40.0;

/// One effective wind applied to the sea state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindStep {
    pub direction_deg: f64,
    pub speed_kn: f64,
    pub duration_h: f64,
}

/// Weight given to the newer observation when blending.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindWeights {
    /// Used when the wind is steady or dropping
    pub decreasing: f64,
    /// Used when the wind is strictly rising
    pub increasing: f64,
}

impl Default for WindWeights {
    fn default() -> Self {
        WindWeights {
            decreasing: 0.25,
            increasing: 0.75,
        }
    }
}

impl WindWeights {
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [("decreasing", self.decreasing), ("increasing", self.increasing)] {
            if !(0.0..=1.0).contains(&w) {
                return Err(SeasError::invalid(format!(
                    "{name} wind weight {w} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    fn for_speeds(&self, current: f64, previous: f64) -> f64 {
        if current > previous {
            self.increasing
        } else {
            self.decreasing
        }
    }
}

/// Effective wind for observation `index`, blended with `index - 1`.
///
/// `None` for the first observation, which seeds the sea rather than stepping
/// it, and for an `index` past the end of the series.
pub fn effective_wind(
    observations: &[WindObservation],
    index: usize,
    weights: &WindWeights,
) -> Option<WindStep> {
    let current = observations.get(index)?;
    let previous = observations.get(index.checked_sub(1)?)?;
    let duration_h = current.duration_h.unwrap_or(DEFAULT_STEP_HOURS);

    if direction_diff(current.direction_deg, previous.direction_deg) >= WIND_SHIFT_DEG {
        return Some(WindStep {
            direction_deg: current.direction_deg,
            speed_kn: current.speed_kn,
            duration_h: duration_h / 2.0,
        });
    }

    let w = weights.for_speeds(current.speed_kn, previous.speed_kn);
    let direction_deg = average_direction(
        &[current.direction_deg, previous.direction_deg],
        Some(&[w, 1.0 - w]),
    );
    let speed_kn = current.speed_kn * w + previous.speed_kn * (1.0 - w);

    Some(WindStep {
        direction_deg,
        speed_kn: (speed_kn * 10.0).round_ties_even() / 10.0,
        duration_h,
    })
}

/// Every effective wind step of a series, starting at the second observation.
pub fn wind_steps<'a>(
    observations: &'a [WindObservation],
    weights: &'a WindWeights,
) -> impl Iterator<Item = WindStep> + 'a {
    (1..observations.len()).filter_map(move |i| effective_wind(observations, i, weights))
}
