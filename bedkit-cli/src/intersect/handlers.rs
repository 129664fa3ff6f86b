use anyhow::{Result, anyhow};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use bedkit_ranges::{BackendKind, IntersectOptions, IntersectOutcome, Intersector, Progress};

use crate::common::{load_config, load_pair, write_table};
use crate::config::BedkitConfig;

/// Feeds an indicatif bar from the engine's per-chromosome updates.
struct BarProgress(ProgressBar);

impl BarProgress {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} chromosomes",
            )?
            .progress_chars("##-"),
        );
        Ok(BarProgress(bar))
    }
}

impl Progress for BarProgress {
    fn update(&mut self, done: usize, total: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(done as u64);
    }

    fn finish(&mut self) {
        self.0.finish_and_clear();
    }
}

///
/// Options from the defaults, then the config file, then the flags.
///
pub fn resolve_options(
    matches: &ArgMatches,
    config: &BedkitConfig,
) -> Result<(IntersectOptions, BackendKind)> {
    let mut options = config.intersect.apply(IntersectOptions::default());

    let (wa, wb) = (matches.get_flag("wa"), matches.get_flag("wb"));
    if wa || wb {
        options.wa = wa;
        options.wb = wb;
    }
    options.wo |= matches.get_flag("wo");
    options.v |= matches.get_flag("v");
    if let Some(f) = matches.get_one::<f64>("f") {
        options.f = *f;
    }
    options.validate()?;

    let backend = match matches.get_one::<String>("backend") {
        Some(name) => name.parse::<BackendKind>().map_err(|e| anyhow!(e))?,
        None => config.intersect.backend.unwrap_or_default(),
    };

    Ok((options, backend))
}

pub fn run_intersect(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let (options, backend) = resolve_options(matches, &config)?;
    let (a, b) = load_pair(matches)?;

    let intersector = Intersector::new(backend)?;
    info!(
        "Intersecting {} x {} regions on the {} backend",
        a.len(),
        b.len(),
        intersector.backend_name()
    );

    let mut progress = BarProgress::new()?;
    let outcome = intersector.run(&a, &b, &options, &mut progress)?;

    let output = matches.get_one::<String>("output");
    match &outcome {
        IntersectOutcome::Overlaps(table) => write_table(Some(table), output),
        IntersectOutcome::Empty(reason) => {
            info!("No rows to report: {reason}");
            write_table(None, output)
        }
    }
}
