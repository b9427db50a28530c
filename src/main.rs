//! # Autoseas Command-Line Runner
//!
//! Runs one wind series over one site and prints a sea report per observation.
//!
//! ```text
//! autoseas <winds.csv> [--site id] [--config path] [--log-level level] [--json]
//! ```
//!
//! The winds file is CSV with a `direction,speed[,duration]` header. The site's
//! fetch table is looked up through the `[site]` section of the config file.

use anyhow::{bail, Context, Result};
use autoseas_lib::config::{Config, CONFIG_FILE};
use autoseas_lib::{logging, FetchDepthSource, SeaReport, Simulation, WindObservation};
use log::info;
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str =
    "usage: autoseas <winds.csv> [--site id] [--config path] [--log-level level] [--json]";

#[derive(Debug, PartialEq)]
struct Args {
    winds: PathBuf,
    site: Option<String>,
    config: PathBuf,
    log_level: Option<String>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut winds = None;
    let mut site = None;
    let mut config = PathBuf::from(CONFIG_FILE);
    let mut log_level = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--site" => site = Some(value("--site")?),
            "--config" => config = PathBuf::from(value("--config")?),
            "--log-level" => log_level = Some(value("--log-level")?),
            "--json" => json = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            path => {
                if winds.replace(PathBuf::from(path)).is_some() {
                    bail!("more than one winds file given\n{USAGE}");
                }
            }
        }
    }

    Ok(Args {
        winds: winds.with_context(|| format!("no winds file given\n{USAGE}"))?,
        site,
        config,
        log_level,
        json,
    })
}

fn read_winds(path: &Path) -> Result<Vec<WindObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening winds file {}", path.display()))?;

    let mut winds = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let wind: WindObservation =
            record.with_context(|| format!("winds file {} row {}", path.display(), line + 1))?;
        winds.push(wind);
    }
    info!("Read {} wind observations from {}", winds.len(), path.display());
    Ok(winds)
}

fn format_report(wind: &WindObservation, report: &SeaReport) -> String {
    let mut line = format!(
        "{:5.0}° {:5.1} kn  ->  {:5.2} m",
        wind.direction_deg, wind.speed_kn, report.height_m
    );
    if let Some(period) = report.period_s {
        line.push_str(&format!(" {period:5.2} s"));
    }
    if let Some(direction) = report.direction_deg {
        line.push_str(&format!(" from {direction:3.0}°"));
    }
    line
}

fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{USAGE}");
        return Ok(());
    }
    let args = parse_args(&raw)?;
    logging::init_logging(args.log_level.as_deref());

    let mut config = Config::load_from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(site) = args.site {
        config.site.id = site;
    }
    config.validate()?;

    let site = config
        .site
        .fetch_source()
        .load_fetch_and_depth(&config.site.id, config.simulation.max_fetch_nm)
        .with_context(|| format!("loading fetch table for site {}", config.site.id))?;
    let tables = config.tables.load().context("loading Bretschneider tables")?;
    let sea_limits = config.site.load_sea_limits().context("loading sea-limits table")?;
    let winds = read_winds(&args.winds)?;

    let simulation = Simulation::new(&site, &config.simulation, tables, sea_limits)?;
    let reports = simulation.run(&winds)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (wind, report) in winds.iter().zip(reports.iter()) {
            println!("{}", format_report(wind, report));
        }
    }
    Ok(())
}
