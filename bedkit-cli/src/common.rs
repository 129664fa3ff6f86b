use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use bedkit_core::models::{LoadOptions, RegionSet};
use bedkit_core::utils::get_dynamic_writer;
use bedkit_ranges::intersect::IntersectTable;
use clap::{Arg, ArgAction, ArgMatches, arg};
use log::{info, warn};

use crate::config::BedkitConfig;

pub const STRICT_ARG: &str = "strict";

pub fn input_arg() -> Arg {
    arg!(--input <BED> "Input BED file, plain or gzipped, or - for stdin").required(true)
}

pub fn output_arg() -> Arg {
    arg!(--output <OUTPUT> "Output file, gzipped when it ends in .gz (default: stdout)")
        .required(false)
}

pub fn strict_arg() -> Arg {
    Arg::new(STRICT_ARG)
        .long(STRICT_ARG)
        .action(ArgAction::SetTrue)
        .help("Fail when a region has start > end instead of warning")
}

/// The `--config` file, or the built-in defaults without one.
pub fn load_config(matches: &ArgMatches) -> Result<BedkitConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => BedkitConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read config file {path}")),
        None => Ok(BedkitConfig::default()),
    }
}

fn load_options(matches: &ArgMatches) -> LoadOptions {
    LoadOptions {
        reject_inverted: matches.get_flag(STRICT_ARG),
    }
}

///
/// Load one BED file and report inverted rows. With `--strict` they are fatal.
///
pub fn load_bed(path: &str, matches: &ArgMatches) -> Result<RegionSet> {
    let rs = RegionSet::load(path, &load_options(matches))
        .with_context(|| format!("Failed to load BED file {path}"))?;

    if let Err(e) = rs.check_order() {
        warn!("{path}: {e}");
    }
    info!("Loaded {} regions ({} columns) from {path}", rs.len(), rs.schema.width());

    Ok(rs)
}

pub fn load_input(matches: &ArgMatches) -> Result<RegionSet> {
    let path = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    load_bed(path, matches)
}

pub fn load_pair(matches: &ArgMatches) -> Result<(RegionSet, RegionSet)> {
    let a_path = matches.get_one::<String>("a").context("-a is required")?;
    let b_path = matches.get_one::<String>("b").context("-b is required")?;
    Ok((load_bed(a_path, matches)?, load_bed(b_path, matches)?))
}

fn open_output(output: Option<&String>) -> Result<Box<dyn Write>> {
    get_dynamic_writer(output.map(Path::new)).with_context(|| {
        format!(
            "Failed to open output {}",
            output.map_or("<stdout>", |p| p.as_str())
        )
    })
}

pub fn write_regionset(rs: &RegionSet, output: Option<&String>) -> Result<()> {
    match output {
        Some(p) => {
            rs.to_bed(p)
                .with_context(|| format!("Failed to write regions to {p}"))?;
            info!("{} regions written to {p}", rs.len());
        }
        None => {
            let mut writer = open_output(None)?;
            rs.write_bed(&mut writer)
                .and_then(|_| writer.flush())
                .context("Failed to write regions")?;
        }
    }
    Ok(())
}

///
/// Write an intersection result. `None` still creates (or truncates) the output file
/// so an empty result leaves an empty file behind.
///
pub fn write_table(table: Option<&IntersectTable>, output: Option<&String>) -> Result<()> {
    let mut writer = open_output(output)?;
    if let Some(table) = table {
        table
            .write_tsv(&mut writer)
            .context("Failed to write intersection")?;
    }
    writer.flush()?;

    if let Some(p) = output {
        info!("{} rows written to {p}", table.map_or(0, IntersectTable::len));
    }
    Ok(())
}
