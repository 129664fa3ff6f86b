mod common;
mod config;
mod intersect;
mod merge;
mod scan;
mod sort;
mod summary;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "bedkit";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Sort, merge, intersect and quality-check BED interval files.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(sort::cli::create_sort_cli())
        .subcommand(merge::cli::create_merge_cli())
        .subcommand(intersect::cli::create_intersect_cli())
        .subcommand(scan::cli::create_scan_cli())
        .subcommand(summary::cli::create_summary_cli())
}

/// `info` unless RUST_LOG says otherwise; `--verbose` and `--quiet` win over both.
fn init_logging(matches: &ArgMatches) -> Result<()> {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    if matches.get_flag("verbose") {
        builder.filter_level(LevelFilter::Debug);
    } else if matches.get_flag("quiet") {
        builder.filter_level(LevelFilter::Error);
    }

    builder.try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(&matches)?;

    match matches.subcommand() {
        //
        // SORT
        //
        Some((sort::cli::SORT_CMD, matches)) => {
            sort::handlers::run_sort(matches)?;
        }

        //
        // MERGE
        //
        Some((merge::cli::MERGE_CMD, matches)) => {
            merge::handlers::run_merge(matches)?;
        }

        //
        // INTERSECT
        //
        Some((intersect::cli::INTERSECT_CMD, matches)) => {
            intersect::handlers::run_intersect(matches)?;
        }

        //
        // QUALITY SCAN
        //
        Some((scan::cli::SCAN_CMD, matches)) => {
            scan::handlers::run_scan(matches)?;
        }

        //
        // SUMMARY
        //
        Some((summary::cli::SUMMARY_CMD, matches)) => {
            summary::handlers::run_summary(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&["bedkit", "sort", "--input", "a.bed"])]
    #[case(&["bedkit", "merge", "--input", "a.bed", "--output", "out.bed.gz", "--strict"])]
    #[case(&["bedkit", "intersect", "-a", "a.bed", "-b", "b.bed", "--wo", "-f", "0.5"])]
    #[case(&["bedkit", "scan", "--input", "a.bed", "--clean", "clean.bed", "--swap-inverted"])]
    #[case(&["bedkit", "--verbose", "summary", "--input", "a.bed", "--genome-size", "1000"])]
    fn test_commands_parse(#[case] argv: &[&str]) {
        assert!(build_parser().try_get_matches_from(argv).is_ok());
    }

    #[rstest]
    fn test_quiet_conflicts_with_verbose() {
        let argv = ["bedkit", "-q", "--verbose", "sort", "--input", "a.bed"];
        let result = build_parser().try_get_matches_from(argv);
        assert!(result.is_err());
    }
}
