use clap::{Arg, ArgAction, Command};

use crate::common::{input_arg, strict_arg};

pub const SCAN_CMD: &str = "scan";

pub fn create_scan_cli() -> Command {
    Command::new(SCAN_CMD)
        .about("Flag non-canonical contigs and bad coordinates; print the report as JSON.")
        .arg(input_arg())
        .arg(
            Arg::new("clean")
                .long("clean")
                .value_name("BED")
                .help("Write the table without flagged rows to this file"),
        )
        .arg(
            Arg::new("swap-inverted")
                .long("swap-inverted")
                .action(ArgAction::SetTrue)
                .help("Keep start > end rows in the cleaned table with start and end exchanged"),
        )
        .arg(strict_arg())
}
