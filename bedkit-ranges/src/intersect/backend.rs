use std::fmt::{self, Display};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use super::bedtools::BedtoolsBackend;
use super::table::Interval;
use crate::errors::IntersectError;

///
/// A strategy for finding candidate overlaps inside one chromosome group.
///
/// Implementations return `(a_index, b_index)` pairs, indices into the two slices, for
/// every pair passing the strict half-open overlap test. Order and duplicates don't
/// matter: the engine sorts, deduplicates and filters the pairs itself.
///
pub trait OverlapBackend {
    fn name(&self) -> &'static str;

    fn overlaps(
        &self,
        chrom: &str,
        a: &[Interval],
        b: &[Interval],
    ) -> Result<Vec<(usize, usize)>, IntersectError>;
}

/// Compares every A interval against every B interval.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanBackend;

impl OverlapBackend for ScanBackend {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn overlaps(
        &self,
        _chrom: &str,
        a: &[Interval],
        b: &[Interval],
    ) -> Result<Vec<(usize, usize)>, IntersectError> {
        let mut pairs = Vec::new();
        for (i, query) in a.iter().enumerate() {
            for (j, target) in b.iter().enumerate() {
                if query.overlaps(target) {
                    pairs.push((i, j));
                }
            }
        }
        Ok(pairs)
    }
}

///
/// Sorted sweep: both sides are ordered by start and B intervals enter an active list
/// once they start before the current A interval ends. Active intervals that end at or
/// before the current A start can never match a later A and are dropped.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct SweepBackend;

impl OverlapBackend for SweepBackend {
    fn name(&self) -> &'static str {
        "sweep"
    }

    fn overlaps(
        &self,
        _chrom: &str,
        a: &[Interval],
        b: &[Interval],
    ) -> Result<Vec<(usize, usize)>, IntersectError> {
        let mut a_order: Vec<usize> = (0..a.len()).collect();
        a_order.sort_by_key(|&i| (a[i].start, a[i].end));

        let mut b_order: Vec<usize> = (0..b.len()).collect();
        b_order.sort_by_key(|&j| b[j].start);

        let mut pairs = Vec::new();
        let mut active: Vec<usize> = Vec::new();
        let mut next = 0;

        for &i in &a_order {
            let query = &a[i];

            while next < b_order.len() && b[b_order[next]].start < query.end {
                active.push(b_order[next]);
                next += 1;
            }

            active.retain(|&j| b[j].end > query.start);

            // a later-starting A may still end before some active B starts
            pairs.extend(
                active
                    .iter()
                    .filter(|&&j| query.overlaps(&b[j]))
                    .map(|&j| (i, j)),
            );
        }

        Ok(pairs)
    }
}

///
/// Which backend an [Intersector](super::Intersector) runs on.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Scan,
    #[default]
    Sweep,
    Bedtools,
    /// `bedtools` when it is installed, the sweep otherwise.
    Auto,
}

impl BackendKind {
    pub const VALUES: [&'static str; 4] = ["scan", "sweep", "bedtools", "auto"];

    ///
    /// Build the backend. `Auto` runs the bedtools capability check once, here.
    ///
    pub fn build(self) -> Result<Box<dyn OverlapBackend>, IntersectError> {
        match self {
            BackendKind::Scan => Ok(Box::new(ScanBackend)),
            BackendKind::Sweep => Ok(Box::new(SweepBackend)),
            BackendKind::Bedtools => match BedtoolsBackend::detect() {
                Some(backend) => Ok(Box::new(backend)),
                None => Err(IntersectError::Backend {
                    backend: "bedtools",
                    message: "`bedtools --version` failed; is bedtools on PATH?".to_string(),
                }),
            },
            BackendKind::Auto => match BedtoolsBackend::detect() {
                Some(backend) => {
                    info!("Using bedtools {} for overlaps", backend.version());
                    Ok(Box::new(backend))
                }
                None => {
                    info!("bedtools not found, using the in-process sweep");
                    Ok(Box::new(SweepBackend))
                }
            },
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scan" => Ok(BackendKind::Scan),
            "sweep" => Ok(BackendKind::Sweep),
            "bedtools" => Ok(BackendKind::Bedtools),
            "auto" => Ok(BackendKind::Auto),
            other => Err(format!(
                "unknown backend '{other}', expected one of {}",
                BackendKind::VALUES.join(", ")
            )),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Scan => "scan",
            BackendKind::Sweep => "sweep",
            BackendKind::Bedtools => "bedtools",
            BackendKind::Auto => "auto",
        };
        write!(f, "{name}")
    }
}
