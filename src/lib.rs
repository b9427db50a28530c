//! # Autoseas Core Library
//!
//! Hindcasts wind-driven seas at a coastal site from a series of wind
//! observations. The sea is held as 36 significant-wave-height bins, one per 10°
//! of direction, and every wind observation grows the bins it blows into while
//! the rest decay.
//!
//! ## Components
//!
//! - [`lookup_table`] and [`inverse`]: bilinear grid lookup and the bisection
//!   solver used to turn a height back into a duration
//! - [`growth`]: the interchangeable growth models (deep-water Bretschneider,
//!   sea-limits grid, SPM shallow water, Breugem–Holthuijsen shallow water)
//! - [`engine`]: the 36-bin sea state, its per-step update and reporting
//! - [`sequencer`]: blends raw wind observations into effective wind steps
//! - [`simulation`]: per-site setup and the run loop
//! - [`fetch`], [`decay`], [`direction`]: site tables and circular helpers
//!
//! ## Data Flow
//! 1. Load a site's fetch/depth table ([`fetch::FetchDepthSource`])
//! 2. Build a [`simulation::Simulation`] from it and a [`config::SimulationConfig`]
//! 3. Run a wind series; get one [`SeaReport`] per observation
//!
//! ## Units
//! Knots, degrees (direction the wind blows from), hours, nautical miles, metres
//! and seconds throughout.

use serde::{Deserialize, Serialize};

pub mod config;
pub mod decay;
pub mod direction;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod growth;
pub mod inverse;
pub mod logging;
pub mod lookup_table;
pub mod sequencer;
pub mod simulation;

pub use config::{Config, SimulationConfig};
pub use engine::{OutputDetail, SeaBins, SeaEngine};
pub use error::{Result, SeasError};
pub use fetch::{CsvFetchDirectory, FetchDepthSource, SiteData};
pub use growth::{GrowthModel, GrowthModelKind};
pub use simulation::{run_simulation, Simulation};

/// One wind observation as supplied by the caller.
///
/// # Example
/// ```
/// use autoseas_lib::WindObservation;
///
/// let gusty = WindObservation::with_duration(225.0, 28.0, 1.5);
/// assert_eq!(gusty.duration_h, Some(1.5));
/// assert_eq!(WindObservation::new(225.0, 28.0).duration_h, None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindObservation {
    /// Direction the wind blows from, [0, 360)
    #[serde(alias = "direction")]
    pub direction_deg: f64,
    /// Wind speed in knots
    #[serde(alias = "speed")]
    pub speed_kn: f64,
    /// Hours this observation stands for; 3 h when absent
    #[serde(default, alias = "duration")]
    pub duration_h: Option<f64>,
}

impl WindObservation {
    pub fn new(direction_deg: f64, speed_kn: f64) -> Self {
        WindObservation {
            direction_deg,
            speed_kn,
            duration_h: None,
        }
    }

    pub fn with_duration(direction_deg: f64, speed_kn: f64, duration_h: f64) -> Self {
        WindObservation {
            direction_deg,
            speed_kn,
            duration_h: Some(duration_h),
        }
    }
}

/// Sea state reported after one wind observation.
///
/// Which optional fields are filled depends on the run's [`OutputDetail`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeaReport {
    /// Largest bin height in metres, never below 0.1
    pub height_m: f64,
    /// Mean direction of the largest bins, whole degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_deg: Option<f64>,
    /// Peak period in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_s: Option<f64>,
}

impl SeaReport {
    pub fn height_only(height_m: f64) -> Self {
        SeaReport {
            height_m,
            direction_deg: None,
            period_s: None,
        }
    }
}
