use clap::{Arg, ArgAction, Command, value_parser};

use bedkit_ranges::BackendKind;

use crate::common::{output_arg, strict_arg};

pub const INTERSECT_CMD: &str = "intersect";

pub fn create_intersect_cli() -> Command {
    Command::new(INTERSECT_CMD)
        .about("Report overlaps between the intervals of two BED files.")
        .long_about(
            "Report overlaps between the intervals of two BED files. Only chrom, start and end \
             take part; touching intervals do not overlap. Without --wa and --wb both are on.",
        )
        .arg(
            Arg::new("a")
                .short('a')
                .value_name("BED_A")
                .required(true)
                .help("Query BED file A"),
        )
        .arg(
            Arg::new("b")
                .short('b')
                .value_name("BED_B")
                .required(true)
                .help("BED file B searched for overlaps"),
        )
        .arg(
            Arg::new("wa")
                .long("wa")
                .action(ArgAction::SetTrue)
                .help("Report the A interval of each overlap"),
        )
        .arg(
            Arg::new("wb")
                .long("wb")
                .action(ArgAction::SetTrue)
                .help("Report the B interval of each overlap"),
        )
        .arg(
            Arg::new("wo")
                .long("wo")
                .action(ArgAction::SetTrue)
                .help("Report both intervals and the overlap length"),
        )
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Report A intervals without any overlap in B"),
        )
        .arg(
            Arg::new("f")
                .short('f')
                .value_name("FRACTION")
                .value_parser(value_parser!(f64))
                .help("Minimum overlap as a fraction of the A interval (0 to 1)"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_parser(BackendKind::VALUES)
                .help("Overlap backend [default: sweep]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("TOML")
                .help("TOML file with [intersect] defaults"),
        )
        .arg(output_arg())
        .arg(strict_arg())
}
