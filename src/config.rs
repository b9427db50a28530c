//! # Configuration Management
//!
//! Loads run settings from `autoseas-config.toml`. Every field has a default, so
//! a missing file or a file that only sets a few keys is fine; a file that exists
//! but does not parse is an error rather than a silent fallback.
//!
//! ## Sections
//! - `[site]`: which site to run and where its fetch table lives
//! - `[simulation]`: growth model, clamps, wind blending, decay and output detail
//! - `[tables]`: optional replacements for the bundled Bretschneider grids

use crate::decay::DecayCurve;
use crate::direction::DirectionProfile;
use crate::engine::OutputDetail;
use crate::error::{Result, SeasError};
use crate::fetch::{CsvFetchDirectory, DEFAULT_DEPTH_M, MAX_FETCH_NM};
use crate::growth::{BretschneiderTables, GrowthModelKind, MAX_DURATION_HOURS};
use crate::lookup_table::LookupTable;
use crate::sequencer::WindWeights;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default location of the configuration file.
pub const CONFIG_FILE: &str = "autoseas-config.toml";

/// Application configuration loaded from autoseas-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub simulation: SimulationConfig,
    pub tables: TablesConfig,
}

/// Site selection
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site identifier; the fetch table is `<fetch_dir>/<id>.csv`
    pub id: String,
    /// Directory holding the per-site fetch tables
    pub fetch_dir: PathBuf,
    /// Direction-by-speed height grid for the mixed growth model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sea_limits_table: Option<PathBuf>,
    /// Depth (m) for directions the fetch table leaves blank
    pub default_depth_m: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            id: "uniform_20nm".to_string(),
            fetch_dir: PathBuf::from("data/sites"),
            sea_limits_table: None,
            default_depth_m: DEFAULT_DEPTH_M,
        }
    }
}

impl SiteConfig {
    pub fn fetch_source(&self) -> CsvFetchDirectory {
        CsvFetchDirectory::new(&self.fetch_dir, self.default_depth_m)
    }

    /// Sea-limits grid, if one is configured.
    pub fn load_sea_limits(&self) -> Result<Option<Arc<LookupTable>>> {
        self.sea_limits_table
            .as_ref()
            .map(|path| LookupTable::from_path(path).map(Arc::new))
            .transpose()
    }
}

/// Per-run simulation settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub growth_model: GrowthModelKind,
    /// Fetches longer than this (nm), and unlimited sectors, are clamped to it
    pub max_fetch_nm: f64,
    /// Seas are treated as fully grown after this many hours
    pub max_duration_hours: f64,
    pub wind_weights: WindWeights,
    /// Seed the first step with this height (m) instead of 4 h of the first wind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_seas_m: Option<f64>,
    pub direction_profile: DirectionProfile,
    /// Smooth each fetch with its two neighbouring directions
    pub average_fetch: bool,
    /// Read decay factors off `decay_curve` instead of using the constant
    pub vary_decrease_factors: bool,
    pub constant_decrease_factor: f64,
    pub decay_curve: DecayCurve,
    pub output: OutputDetail,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            growth_model: GrowthModelKind::Deep,
            max_fetch_nm: MAX_FETCH_NM,
            max_duration_hours: MAX_DURATION_HOURS,
            wind_weights: WindWeights::default(),
            starting_seas_m: None,
            direction_profile: DirectionProfile::Wide,
            average_fetch: true,
            vary_decrease_factors: false,
            constant_decrease_factor: crate::decay::CONSTANT_DECREASE_FACTOR,
            decay_curve: DecayCurve::default(),
            output: OutputDetail::Height,
        }
    }
}

impl SimulationConfig {
    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_fetch_nm > 0.0) {
            return Err(SeasError::invalid(format!(
                "max fetch must be positive, got {}",
                self.max_fetch_nm
            )));
        }
        if !(self.max_duration_hours > 0.0) {
            return Err(SeasError::invalid(format!(
                "max duration must be positive, got {}",
                self.max_duration_hours
            )));
        }
        if let Some(height) = self.starting_seas_m {
            if !(height >= 0.0) {
                return Err(SeasError::invalid(format!(
                    "starting seas must be non-negative, got {height}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.constant_decrease_factor) {
            return Err(SeasError::invalid(format!(
                "decrease factor {} is outside [0, 1]",
                self.constant_decrease_factor
            )));
        }
        self.wind_weights.validate()?;
        self.decay_curve.validate()
    }
}

/// Replacement grid files
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TablesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_limits: Option<PathBuf>,
}

impl TablesConfig {
    /// Bretschneider grids from the configured files, or the bundled ones.
    ///
    /// Overriding one grid without the other is rejected.
    pub fn load(&self) -> Result<Arc<BretschneiderTables>> {
        let tables = match (&self.durations, &self.fetch_limits) {
            (None, None) => BretschneiderTables::bundled()?,
            (Some(durations), Some(fetch_limits)) => {
                BretschneiderTables::from_paths(durations, fetch_limits)?
            }
            _ => {
                return Err(SeasError::invalid(
                    "[tables] needs both durations and fetch_limits, or neither",
                ))
            }
        };
        Ok(Arc::new(tables))
    }
}

impl Config {
    /// Load configuration from autoseas-config.toml
    pub fn load() -> Result<Self> {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from `path`, using defaults if the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "No config file at {}, using default configuration",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        info!(
            "Loaded configuration for site {} ({:?} model)",
            config.site.id, config.simulation.growth_model
        );
        Ok(config)
    }

    /// Write configuration to `path` as TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.site.id.trim().is_empty() {
            return Err(SeasError::invalid("site id is empty"));
        }
        if self.simulation.growth_model == GrowthModelKind::Mixed
            && self.site.sea_limits_table.is_none()
        {
            return Err(SeasError::invalid(
                "mixed growth model needs [site] sea_limits_table",
            ));
        }
        self.simulation.validate()
    }
}
