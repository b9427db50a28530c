//! # Simulation Runs
//!
//! A run is a fold over the wind series: the first observation seeds the sea
//! bins, every later observation becomes one effective wind step, and a report
//! is taken after the seed and after each step. Output length always equals
//! input length.
//!
//! ## Per-run Setup
//! 1. Site fetches are clamped to the run's max fetch and optionally smoothed.
//! 2. Decrease factors are either constant or read off the decay curve at the
//!    site's decay fetch (unlimited sectors at 100 nm, always smoothed).
//! 3. The selected growth model is built over the prepared site.
//!
//! Models and tables are shared read-only; each run owns its bins, so one
//! [`Simulation`] may be used for many wind series, from many threads.

use crate::config::SimulationConfig;
use crate::decay::DecreaseFactors;
use crate::engine::{SeaBins, SeaEngine, INITIAL_DURATION_HOURS};
use crate::error::{Result, SeasError};
use crate::fetch::SiteData;
use crate::growth::{build_growth_model, BretschneiderTables};
use crate::lookup_table::LookupTable;
use crate::sequencer::{wind_steps, WindStep};
use crate::{SeaReport, WindObservation};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

/// One row of a traced run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceStep {
    /// Wind applied; for the seed row, the first observation and seed duration
    pub wind: WindStep,
    /// Bins after the wind was applied
    pub bins: SeaBins,
    pub report: SeaReport,
}

/// A configured simulation for one site.
pub struct Simulation {
    engine: SeaEngine,
    config: SimulationConfig,
}

impl Simulation {
    /// Prepare `site` and build the configured growth model.
    ///
    /// `sea_limits` is only consulted by the mixed model.
    pub fn new(
        site: &SiteData,
        config: &SimulationConfig,
        tables: Arc<BretschneiderTables>,
        sea_limits: Option<Arc<LookupTable>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut prepared = SiteData::from_raw(
            site.raw_fetch,
            site.depth,
            config.max_fetch_nm,
            site.note.clone(),
        );
        if config.average_fetch {
            prepared.fetch = prepared.fetch.smoothed();
        }

        let decrease = if config.vary_decrease_factors {
            let factors = DecreaseFactors::varying(&config.decay_curve, &site.fetch_for_decay());
            debug!("Decrease factors by bin: {:?}", factors.as_array());
            factors
        } else {
            DecreaseFactors::constant(config.constant_decrease_factor)
        };

        let model = build_growth_model(
            config.growth_model,
            &prepared,
            tables,
            sea_limits,
            config.max_duration_hours,
        )?;

        Ok(Simulation {
            engine: SeaEngine::new(model, config.direction_profile.weights(), decrease),
            config: config.clone(),
        })
    }

    pub fn engine(&self) -> &SeaEngine {
        &self.engine
    }

    /// One report per wind observation.
    pub fn run(&self, winds: &[WindObservation]) -> Result<Vec<SeaReport>> {
        let mut reports = Vec::with_capacity(winds.len());
        self.fold(winds, |_, _, report| reports.push(report))?;
        Ok(reports)
    }

    /// Like [`Simulation::run`], also keeping every step's wind and bins.
    pub fn run_with_trace(&self, winds: &[WindObservation]) -> Result<Vec<TraceStep>> {
        let mut trace = Vec::with_capacity(winds.len());
        self.fold(winds, |wind, bins, report| {
            trace.push(TraceStep {
                wind: *wind,
                bins: *bins,
                report,
            })
        })?;
        Ok(trace)
    }

    fn fold<F>(&self, winds: &[WindObservation], mut emit: F) -> Result<()>
    where
        F: FnMut(&WindStep, &SeaBins, SeaReport),
    {
        validate_winds(winds)?;
        let output = self.config.output;

        let first = &winds[0];
        let (mut state, seed) = match self.config.starting_seas_m {
            Some(height) => (
                self.engine.init_from_height(first.direction_deg, height),
                0.0,
            ),
            None => (
                self.engine.init_from_duration(
                    first.direction_deg,
                    first.speed_kn,
                    INITIAL_DURATION_HOURS,
                ),
                INITIAL_DURATION_HOURS,
            ),
        };
        let seed_wind = WindStep {
            direction_deg: first.direction_deg,
            speed_kn: first.speed_kn,
            duration_h: seed,
        };
        emit(&seed_wind, &state, self.engine.report(&state, first.speed_kn, output));

        for wind in wind_steps(winds, &self.config.wind_weights) {
            state = self.engine.step(&state, &wind)?;
            emit(&wind, &state, self.engine.report(&state, wind.speed_kn, output));
        }

        info!("Simulated {} wind steps", winds.len());
        Ok(())
    }
}

/// Run `winds` over `site` with the bundled Bretschneider grids.
///
/// The mixed model needs a sea-limits grid; use [`Simulation::new`] for it.
pub fn run_simulation(
    site: &SiteData,
    winds: &[WindObservation],
    config: &SimulationConfig,
) -> Result<Vec<SeaReport>> {
    let tables = Arc::new(BretschneiderTables::bundled()?);
    Simulation::new(site, config, tables, None)?.run(winds)
}

/// Reject wind series no run can start from.
pub fn validate_winds(winds: &[WindObservation]) -> Result<()> {
    if winds.is_empty() {
        return Err(SeasError::invalid("wind series is empty"));
    }
    for (i, wind) in winds.iter().enumerate() {
        if !(0.0..360.0).contains(&wind.direction_deg) {
            return Err(SeasError::invalid(format!(
                "wind {i}: direction {} is outside [0, 360)",
                wind.direction_deg
            )));
        }
        if !(wind.speed_kn >= 0.0) || !wind.speed_kn.is_finite() {
            return Err(SeasError::invalid(format!(
                "wind {i}: speed {} kn is not a non-negative number",
                wind.speed_kn
            )));
        }
        if let Some(hours) = wind.duration_h {
            if !(hours >= 0.0) || !hours.is_finite() {
                return Err(SeasError::invalid(format!(
                    "wind {i}: duration {hours} h is not a non-negative number"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OutputDetail;
    use crate::growth::test_support::tables;

    fn steady(n: usize) -> Vec<WindObservation> {
        (0..n).map(|_| WindObservation::new(90.0, 20.0)).collect()
    }

    #[test]
    fn one_report_per_observation() {
        let site = SiteData::uniform(20.0, 50.0);
        let sim = Simulation::new(&site, &SimulationConfig::default(), tables(), None).unwrap();
        assert_eq!(sim.run(&steady(1)).unwrap().len(), 1);
        assert_eq!(sim.run(&steady(5)).unwrap().len(), 5);
    }

    #[test]
    fn bad_winds_are_rejected_before_running() {
        let site = SiteData::uniform(20.0, 50.0);
        let sim = Simulation::new(&site, &SimulationConfig::default(), tables(), None).unwrap();

        for winds in [
            vec![],
            vec![WindObservation::new(360.0, 10.0)],
            vec![WindObservation::new(-5.0, 10.0)],
            vec![WindObservation::new(f64::NAN, 10.0)],
            vec![WindObservation::new(90.0, -1.0)],
            vec![WindObservation::with_duration(90.0, 10.0, -3.0)],
        ] {
            let err = sim.run(&winds).unwrap_err();
            assert!(matches!(err, SeasError::InvalidConfiguration(_)), "{winds:?}");
        }
    }

    #[test]
    fn starting_seas_override_seed() {
        let site = SiteData::uniform(20.0, 50.0);
        let config = SimulationConfig {
            starting_seas_m: Some(2.5),
            ..SimulationConfig::default()
        };
        let sim = Simulation::new(&site, &config, tables(), None).unwrap();
        let reports = sim.run(&steady(1)).unwrap();
        assert_eq!(reports[0].height_m, 2.5);
    }

    #[test]
    fn max_fetch_clamps_site() {
        let site = SiteData::uniform(80.0, 50.0);
        let long_wind = vec![WindObservation::with_duration(0.0, 30.0, 36.0); 4];

        let open = run_simulation(&site, &long_wind, &SimulationConfig::default()).unwrap();
        let clamped = run_simulation(
            &site,
            &long_wind,
            &SimulationConfig {
                max_fetch_nm: 10.0,
                ..SimulationConfig::default()
            },
        )
        .unwrap();
        assert!(clamped[3].height_m < open[3].height_m);
    }

    #[test]
    fn trace_matches_run() {
        let site = SiteData::uniform(20.0, 50.0);
        let config = SimulationConfig {
            output: OutputDetail::HeightPeriodDirection,
            ..SimulationConfig::default()
        };
        let sim = Simulation::new(&site, &config, tables(), None).unwrap();
        let winds = steady(3);

        let trace = sim.run_with_trace(&winds).unwrap();
        let reports = sim.run(&winds).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[0].wind.duration_h, INITIAL_DURATION_HOURS);
        for (row, report) in trace.iter().zip(reports.iter()) {
            assert_eq!(&row.report, report);
            assert_eq!(row.bins.max_height().max(0.1), report.height_m);
        }
    }

    #[test]
    fn trace_serializes_to_json() {
        let site = SiteData::uniform(20.0, 50.0);
        let sim = Simulation::new(&site, &SimulationConfig::default(), tables(), None).unwrap();
        let trace = sim.run_with_trace(&steady(2)).unwrap();

        let json = serde_json::to_value(&trace).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["wind"]["duration_h"], INITIAL_DURATION_HOURS);
        assert_eq!(
            rows[1]["bins"]["heights"].as_array().unwrap().len(),
            crate::direction::BIN_COUNT
        );
        assert_eq!(rows[1]["report"]["height_m"], trace[1].report.height_m);
    }

    #[test]
    fn varying_decay_keeps_open_water_swell_longer() {
        let mut raw = [crate::fetch::RawFetch::Limited(5.0); crate::direction::BIN_COUNT];
        for bin in raw.iter_mut().take(6) {
            *bin = crate::fetch::RawFetch::Unlimited;
        }
        let site = SiteData::from_raw(raw, crate::fetch::DirectionalTable::uniform(50.0), 100.0, "");
        let config = SimulationConfig {
            vary_decrease_factors: true,
            direction_profile: crate::direction::DirectionProfile::Narrow,
            ..SimulationConfig::default()
        };
        let sim = Simulation::new(&site, &config, tables(), None).unwrap();

        let factors = sim.engine().decrease_factors();
        assert!((factors.at_bin(2) - 0.9).abs() < 1e-12);
        assert!((factors.at_bin(20) - 0.7).abs() < 1e-12);
    }
}
