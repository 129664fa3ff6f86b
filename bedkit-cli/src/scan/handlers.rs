use anyhow::{Context, Result};
use clap::ArgMatches;

use bedkit_ranges::quality::{InvertedPolicy, ScanOptions, scan_with};

use crate::common::{load_input, write_regionset};

pub fn run_scan(matches: &ArgMatches) -> Result<()> {
    let rs = load_input(matches)?;

    let options = ScanOptions {
        inverted: match matches.get_flag("swap-inverted") {
            true => InvertedPolicy::Swap,
            false => InvertedPolicy::Drop,
        },
    };
    let (report, cleaned) = scan_with(&rs, &options);

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if let Some(path) = matches.get_one::<String>("clean") {
        write_regionset(&cleaned, Some(path))?;
    }

    Ok(())
}
