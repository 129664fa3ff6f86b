use anyhow::{Context, Result};
use clap::ArgMatches;

use bedkit_ranges::BedOperations;
use bedkit_ranges::summary::DEFAULT_GENOME_SIZE;

use crate::common::{load_config, load_input};

pub fn run_summary(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let genome_size = matches
        .get_one::<u64>("genome-size")
        .copied()
        .or(config.summary.genome_size)
        .unwrap_or(DEFAULT_GENOME_SIZE);

    let rs = load_input(matches)?;
    let summary = rs.summarize(genome_size);

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );
    Ok(())
}
