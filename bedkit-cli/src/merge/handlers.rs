use anyhow::Result;
use bedkit_ranges::BedOperations;
use clap::ArgMatches;
use log::info;

use crate::common::{load_input, write_regionset};

pub fn run_merge(matches: &ArgMatches) -> Result<()> {
    let rs = load_input(matches)?;
    let merged = rs.merge();
    info!("Merged {} regions into {}", rs.len(), merged.len());
    write_regionset(&merged, matches.get_one::<String>("output"))
}
