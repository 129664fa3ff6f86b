use clap::Command;

use crate::common::{input_arg, output_arg, strict_arg};

pub const MERGE_CMD: &str = "merge";

pub fn create_merge_cli() -> Command {
    Command::new(MERGE_CMD)
        .about("Merge overlapping and touching intervals on each chromosome.")
        .arg(input_arg())
        .arg(output_arg())
        .arg(strict_arg())
}
