//! # Fetch and Depth Tables
//!
//! Per-direction coastline constraints for a site: how far the wind can blow over
//! open water from each 10° sector (fetch, nautical miles) and how deep that water
//! is (metres).
//!
//! ## Site File Format
//!
//! One CSV per site, named `<site id>.csv`:
//!
//! ```text
//! windDir,fetch,depth
//! note,Bay open to the west,
//! 0,3.0,
//! 10,4.5,12
//! ...
//! 350,U,20
//! ```
//!
//! - `fetch` is a number or `U` for unlimited. Unlimited resolves to the run's
//!   maximum fetch; finite values above the maximum are clamped to it.
//! - A blank `depth` is filled with the default depth.
//! - A row whose `windDir` is `note` carries a free-text note in its `fetch` column.
//! - Every direction 0, 10, …, 350 must appear exactly once.
//!
//! The raw fetches (with unlimited sectors kept as such) are retained alongside
//! the resolved table because decay factors are derived from them.

use crate::direction::{bin_direction, dir_index, BIN_COUNT};
use crate::error::{Result, SeasError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Fetch (nm) that "unlimited" resolves to when deriving decay factors.
pub const MAX_FETCH_NM: f64 = 100.0;

/// Depth (m) used where a site file leaves the depth blank.
pub const DEFAULT_DEPTH_M: f64 = 50.0;

/// Weights for (previous, same, next) bin when smoothing fetches.
pub const FETCH_WEIGHTS: [f64; 3] = [0.2, 0.6, 0.2];

/// One value per 10° direction bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalTable {
    values: [f64; BIN_COUNT],
}

impl DirectionalTable {
    pub fn new(values: [f64; BIN_COUNT]) -> Self {
        DirectionalTable { values }
    }

    /// Same value in every direction.
    pub fn uniform(value: f64) -> Self {
        DirectionalTable {
            values: [value; BIN_COUNT],
        }
    }

    /// Value for the bin nearest `direction_deg`.
    pub fn get(&self, direction_deg: f64) -> f64 {
        self.values[dir_index(direction_deg)]
    }

    /// Value stored at bin `index`.
    pub fn at_bin(&self, index: usize) -> f64 {
        self.values[index % BIN_COUNT]
    }

    pub fn values(&self) -> &[f64; BIN_COUNT] {
        &self.values
    }

    /// Weighted average with the two neighbouring bins ([`FETCH_WEIGHTS`]).
    pub fn smoothed(&self) -> Self {
        let mut values = [0.0; BIN_COUNT];
        for (i, value) in values.iter_mut().enumerate() {
            let prev = self.values[(i + BIN_COUNT - 1) % BIN_COUNT];
            let next = self.values[(i + 1) % BIN_COUNT];
            *value = prev * FETCH_WEIGHTS[0]
                + self.values[i] * FETCH_WEIGHTS[1]
                + next * FETCH_WEIGHTS[2];
        }
        DirectionalTable { values }
    }
}

/// Fetch as written in the site file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawFetch {
    Limited(f64),
    Unlimited,
}

impl RawFetch {
    fn resolve(self, max_fetch: f64) -> f64 {
        match self {
            RawFetch::Limited(nm) => nm.min(max_fetch),
            RawFetch::Unlimited => max_fetch,
        }
    }
}

/// Everything the simulation needs to know about a site's coastline.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteData {
    /// Fetch per bin, unlimited resolved and clamped to the run's max fetch
    pub fetch: DirectionalTable,
    /// Water depth per bin
    pub depth: DirectionalTable,
    /// Fetch per bin as found in the source
    pub raw_fetch: [RawFetch; BIN_COUNT],
    /// Free-text note attached to the site, empty if none
    pub note: String,
}

impl SiteData {
    /// Site with identical fetch and depth in every direction.
    pub fn uniform(fetch_nm: f64, depth_m: f64) -> Self {
        SiteData {
            fetch: DirectionalTable::uniform(fetch_nm),
            depth: DirectionalTable::uniform(depth_m),
            raw_fetch: [RawFetch::Limited(fetch_nm); BIN_COUNT],
            note: String::new(),
        }
    }

    /// Site built from raw per-bin fetches and depths.
    pub fn from_raw(
        raw_fetch: [RawFetch; BIN_COUNT],
        depth: DirectionalTable,
        max_fetch: f64,
        note: impl Into<String>,
    ) -> Self {
        let mut fetch = [0.0; BIN_COUNT];
        for (resolved, raw) in fetch.iter_mut().zip(raw_fetch.iter()) {
            *resolved = raw.resolve(max_fetch);
        }
        SiteData {
            fetch: DirectionalTable::new(fetch),
            depth,
            raw_fetch,
            note: note.into(),
        }
    }

    /// Load a site file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P, max_fetch: f64, default_depth: f64) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path)
            .map_err(|e| SeasError::data_source(&name, format!("cannot open: {e}")))?;
        let site = Self::from_reader(&name, file, max_fetch, default_depth)?;
        info!("Loaded fetch table {name}");
        if !site.note.is_empty() {
            info!("Site note: {}", site.note);
        }
        Ok(site)
    }

    /// Parse a site file from any reader. `name` only labels errors.
    pub fn from_reader<R: Read>(
        name: &str,
        reader: R,
        max_fetch: f64,
        default_depth: f64,
    ) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut raw_fetch: [Option<RawFetch>; BIN_COUNT] = [None; BIN_COUNT];
        let mut depth = [default_depth; BIN_COUNT];
        let mut note = String::new();

        for record in csv_reader.deserialize() {
            let record: FetchRecord = record?;

            if record.wind_dir.eq_ignore_ascii_case("note") {
                note = record.fetch;
                continue;
            }

            let index = parse_direction(name, &record.wind_dir)?;
            if raw_fetch[index].is_some() {
                return Err(SeasError::data_source(
                    name,
                    format!("direction {} listed twice", record.wind_dir),
                ));
            }
            raw_fetch[index] = Some(parse_fetch(name, &record.wind_dir, &record.fetch)?);

            match record.depth.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
                Some(cell) => depth[index] = parse_depth(name, &record.wind_dir, cell)?,
                None => debug!(
                    "{name}: no depth for {}, using {default_depth} m",
                    record.wind_dir
                ),
            }
        }

        let missing: Vec<String> = raw_fetch
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_none())
            .map(|(i, _)| format!("{}", bin_direction(i)))
            .collect();
        if !missing.is_empty() {
            return Err(SeasError::data_source(
                name,
                format!("missing directions {}", missing.join(", ")),
            ));
        }

        let raw_fetch = raw_fetch.map(|f| f.unwrap_or(RawFetch::Unlimited));
        Ok(Self::from_raw(
            raw_fetch,
            DirectionalTable::new(depth),
            max_fetch,
            note,
        ))
    }

    /// Fetch table used to derive decay factors: unlimited sectors at
    /// [`MAX_FETCH_NM`], finite fetches unclamped, then smoothed.
    pub fn fetch_for_decay(&self) -> DirectionalTable {
        let values = self.raw_fetch.map(|raw| match raw {
            RawFetch::Limited(nm) => nm,
            RawFetch::Unlimited => MAX_FETCH_NM,
        });
        DirectionalTable::new(values).smoothed()
    }
}

#[derive(Debug, Deserialize)]
struct FetchRecord {
    #[serde(rename = "windDir")]
    wind_dir: String,
    fetch: String,
    #[serde(default)]
    depth: Option<String>,
}

fn parse_direction(name: &str, cell: &str) -> Result<usize> {
    let bad = || SeasError::data_source(name, format!("'{cell}' is not a direction 0..350 step 10"));
    let deg: u32 = cell.parse().map_err(|_| bad())?;
    if deg % 10 != 0 || deg >= 360 {
        return Err(bad());
    }
    Ok((deg / 10) as usize)
}

fn parse_fetch(name: &str, dir: &str, cell: &str) -> Result<RawFetch> {
    if cell.eq_ignore_ascii_case("u") {
        debug!("{name}: unlimited fetch at {dir}");
        return Ok(RawFetch::Unlimited);
    }
    match cell.parse::<f64>() {
        Ok(nm) if nm.is_finite() && nm >= 0.0 => Ok(RawFetch::Limited(nm)),
        _ => Err(SeasError::data_source(
            name,
            format!("fetch '{cell}' at {dir} is not a non-negative number or U"),
        )),
    }
}

fn parse_depth(name: &str, dir: &str, cell: &str) -> Result<f64> {
    match cell.parse::<f64>() {
        Ok(m) if m.is_finite() && m >= 0.0 => Ok(m),
        _ => Err(SeasError::data_source(
            name,
            format!("depth '{cell}' at {dir} is not a non-negative number"),
        )),
    }
}

/// Supplies per-site fetch and depth tables to a simulation.
pub trait FetchDepthSource {
    fn load_fetch_and_depth(&self, site_id: &str, max_fetch: f64) -> Result<SiteData>;
}

/// Site files stored as `<dir>/<site id>.csv`.
#[derive(Clone, Debug)]
pub struct CsvFetchDirectory {
    dir: PathBuf,
    default_depth: f64,
}

impl CsvFetchDirectory {
    pub fn new(dir: impl Into<PathBuf>, default_depth: f64) -> Self {
        CsvFetchDirectory {
            dir: dir.into(),
            default_depth,
        }
    }

    pub fn path_for(&self, site_id: &str) -> PathBuf {
        self.dir.join(format!("{site_id}.csv"))
    }
}

impl FetchDepthSource for CsvFetchDirectory {
    fn load_fetch_and_depth(&self, site_id: &str, max_fetch: f64) -> Result<SiteData> {
        SiteData::from_path(self.path_for(site_id), max_fetch, self.default_depth)
    }
}
