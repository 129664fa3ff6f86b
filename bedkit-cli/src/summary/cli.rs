use clap::{Arg, Command, value_parser};

use crate::common::{input_arg, strict_arg};

pub const SUMMARY_CMD: &str = "summary";

pub fn create_summary_cli() -> Command {
    Command::new(SUMMARY_CMD)
        .about("Print size and coverage statistics of a BED file as JSON.")
        .arg(input_arg())
        .arg(
            Arg::new("genome-size")
                .long("genome-size")
                .value_name("BASES")
                .value_parser(value_parser!(u64))
                .help("Genome size used for coverage [default: 3299210039]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("TOML")
                .help("TOML file with a [summary] genome_size"),
        )
        .arg(strict_arg())
}
