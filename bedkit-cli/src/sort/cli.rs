use clap::Command;

use crate::common::{input_arg, output_arg, strict_arg};

pub const SORT_CMD: &str = "sort";

pub fn create_sort_cli() -> Command {
    Command::new(SORT_CMD)
        .about("Sort a BED file by chromosome (lexically), start and end.")
        .arg(input_arg())
        .arg(output_arg())
        .arg(strict_arg())
}
