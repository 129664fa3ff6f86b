use anyhow::Result;
use bedkit_ranges::BedOperations;
use clap::ArgMatches;

use crate::common::{load_input, write_regionset};

pub fn run_sort(matches: &ArgMatches) -> Result<()> {
    let rs = load_input(matches)?;
    let sorted = rs.sort();
    write_regionset(&sorted, matches.get_one::<String>("output"))
}
