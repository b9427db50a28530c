//! # Lookup Tables
//!
//! Two-dimensional reference grids (duration-height, fetch-height and per-site
//! sea-limit curves) loaded once from CSV and queried with bilinear interpolation.
//!
//! ## File Format
//!
//! The header row holds the numeric column keys (its first cell is a free label),
//! every following row holds a numeric row key followed by one value per column:
//!
//! ```text
//! knots/hours,0,1,2,3
//! 0,0.00,0.00,0.00,0.00
//! 10,0.00,0.19,0.27,0.33
//! 20,0.00,0.53,0.77,0.95
//! ```
//!
//! Both key axes must be strictly ascending. A table is read-only after load and
//! can be shared freely between simulations.
//!
//! ## Interpolation
//!
//! A query value is first turned into a fractional index along each axis by a
//! linear scan over the sorted keys. Values beyond the last key clamp to the last
//! index, values before the first key clamp to index zero, so a lookup never
//! extrapolates. The grid is then sampled bilinearly at that fractional position.

use crate::error::{Result, SeasError};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Numeric grid with sorted row and column keys.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    rows: Vec<f64>,
    cols: Vec<f64>,
    data: Vec<Vec<f64>>,
}

impl LookupTable {
    /// Build a table from already parsed parts, checking shape and key order.
    pub fn new(rows: Vec<f64>, cols: Vec<f64>, data: Vec<Vec<f64>>) -> Result<Self> {
        Self::validated("in-memory table", rows, cols, data)
    }

    /// Load a table from a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SeasError::data_source(path.display().to_string(), format!("cannot open: {e}"))
        })?;
        let table = Self::from_reader(&path.display().to_string(), file)?;
        info!(
            "Loaded lookup table {} ({} rows x {} cols)",
            path.display(),
            table.rows.len(),
            table.cols.len()
        );
        Ok(table)
    }

    /// Parse a table from CSV text, e.g. a grid bundled with `include_str!`.
    pub fn from_csv_str(name: &str, text: &str) -> Result<Self> {
        Self::from_reader(name, text.as_bytes())
    }

    /// Parse a table from any CSV reader. `name` only labels errors.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut cols = None;
        let mut rows = Vec::new();
        let mut data = Vec::new();

        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let numbers = record
                .iter()
                .skip(1)
                .map(|cell| parse_cell(name, line + 1, cell))
                .collect::<Result<Vec<f64>>>()?;

            if cols.is_none() {
                cols = Some(numbers);
                continue;
            }

            let key = record.get(0).unwrap_or_default();
            rows.push(parse_cell(name, line + 1, key)?);
            data.push(numbers);
        }

        let cols = cols.ok_or_else(|| SeasError::data_source(name, "no header row"))?;
        Self::validated(name, rows, cols, data)
    }

    fn validated(name: &str, rows: Vec<f64>, cols: Vec<f64>, data: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() {
            return Err(SeasError::data_source(name, "table has no rows or no columns"));
        }
        if data.len() != rows.len() {
            return Err(SeasError::data_source(
                name,
                format!("{} row keys but {} data rows", rows.len(), data.len()),
            ));
        }
        if let Some(i) = data.iter().position(|row| row.len() != cols.len()) {
            return Err(SeasError::data_source(
                name,
                format!(
                    "row {} has {} values, expected {}",
                    i + 1,
                    data[i].len(),
                    cols.len()
                ),
            ));
        }
        if !strictly_ascending(&rows) {
            return Err(SeasError::data_source(name, "row keys are not strictly ascending"));
        }
        if !strictly_ascending(&cols) {
            return Err(SeasError::data_source(name, "column keys are not strictly ascending"));
        }

        Ok(LookupTable { rows, cols, data })
    }

    /// Row keys in ascending order.
    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    /// Column keys in ascending order.
    pub fn cols(&self) -> &[f64] {
        &self.cols
    }

    /// Bilinear lookup at (`row_val`, `col_val`), clamped to the table extent.
    pub fn interpolate(&self, row_val: f64, col_val: f64) -> f64 {
        let ri = fractional_index(&self.rows, row_val);
        let ci = fractional_index(&self.cols, col_val);

        let r0 = ri.floor() as usize;
        let c0 = ci.floor() as usize;
        let r1 = (r0 + 1).min(self.rows.len() - 1);
        let c1 = (c0 + 1).min(self.cols.len() - 1);
        let fr = ri - r0 as f64;
        let fc = ci - c0 as f64;

        let top = self.data[r0][c0] * (1.0 - fc) + self.data[r0][c1] * fc;
        let bottom = self.data[r1][c0] * (1.0 - fc) + self.data[r1][c1] * fc;
        top * (1.0 - fr) + bottom * fr
    }
}

fn parse_cell(name: &str, line: usize, cell: &str) -> Result<f64> {
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            SeasError::data_source(name, format!("line {line}: '{cell}' is not a number"))
        })
}

fn strictly_ascending(keys: &[f64]) -> bool {
    keys.windows(2).all(|w| w[0] < w[1])
}

/// Real-valued position of `value` within sorted `keys`.
fn fractional_index(keys: &[f64], value: f64) -> f64 {
    let last = keys.len() - 1;
    if value <= keys[0] {
        return 0.0;
    }
    match keys.iter().position(|&k| k >= value) {
        Some(i) if keys[i] == value => i as f64,
        Some(i) => {
            let lo = keys[i - 1];
            (i - 1) as f64 + (value - lo) / (keys[i] - lo)
        }
        None => last as f64,
    }
}
