use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::sync::LazyLock;

use bedkit_core::models::{Region, RegionSet};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

///
/// Categories of suspicious records. A record may fall in several at once.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anomaly {
    /// `chrUn_*`: contigs not placed on a chromosome
    Unplaced,
    /// `*_random`: contigs known to belong to a chromosome at an unknown position
    Random,
    /// `*_alt`, `*_hap1`: alternate haplotypes
    AltHaplotype,
    Scaffold,
    /// Patches, decoys, viral and HLA sequences, bare GenBank contigs
    Bizarre,
    /// `start >= end`
    InvertedCoordinates,
    /// start or end could not be read
    MissingCoordinates,
}

impl Anomaly {
    pub const ALL: [Anomaly; 7] = [
        Anomaly::Unplaced,
        Anomaly::Random,
        Anomaly::AltHaplotype,
        Anomaly::Scaffold,
        Anomaly::Bizarre,
        Anomaly::InvertedCoordinates,
        Anomaly::MissingCoordinates,
    ];
}

impl Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anomaly::Unplaced => "unplaced",
            Anomaly::Random => "random",
            Anomaly::AltHaplotype => "alt_haplotype",
            Anomaly::Scaffold => "scaffold",
            Anomaly::Bizarre => "bizarre",
            Anomaly::InvertedCoordinates => "inverted_coordinates",
            Anomaly::MissingCoordinates => "missing_coordinates",
        };
        write!(f, "{name}")
    }
}

static CONTIG_PATTERNS: LazyLock<Vec<(Anomaly, Regex)>> = LazyLock::new(|| {
    [
        (Anomaly::Unplaced, r"^(chr)?Un(_|$)"),
        (Anomaly::Random, r"_random$"),
        (Anomaly::AltHaplotype, r"(_alt|_hap\d*)$"),
        (Anomaly::Scaffold, r"(?i)scaffold"),
        (
            Anomaly::Bizarre,
            r"_fix$|_decoy$|^(chr)?EBV$|^HLA-|^(GL|KI|JH|KN|KZ|ML|MU)\d+",
        ),
    ]
    .into_iter()
    .map(|(anomaly, pattern)| {
        (
            anomaly,
            Regex::new(pattern).expect("contig patterns are valid regexes"),
        )
    })
    .collect()
});

///
/// Contig-name categories of a chromosome token.
///
pub fn classify_contig(chrom: &str) -> Vec<Anomaly> {
    CONTIG_PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(chrom))
        .map(|(anomaly, _)| *anomaly)
        .collect()
}

///
/// Every category a record falls in: its contig name plus its coordinates.
///
pub fn classify(region: &Region) -> Vec<Anomaly> {
    let mut anomalies = classify_contig(&region.chr);
    match region.coords() {
        None => anomalies.push(Anomaly::MissingCoordinates),
        Some((start, end)) if start >= end => anomalies.push(Anomaly::InvertedCoordinates),
        Some(_) => {}
    }
    anomalies
}

/// What cleaning does with `start > end` rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvertedPolicy {
    #[default]
    Drop,
    /// Exchange start and end. Zero-length rows are still dropped.
    Swap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    pub inverted: InvertedPolicy,
}

///
/// Per-category counts over a table. Every category is present, zero or not.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub counts: BTreeMap<Anomaly, usize>,
    /// Rows in at least one category.
    pub flagged_rows: usize,
    pub total_rows: usize,
}

impl Default for QualityReport {
    fn default() -> Self {
        QualityReport {
            counts: Anomaly::ALL.iter().map(|a| (*a, 0)).collect(),
            flagged_rows: 0,
            total_rows: 0,
        }
    }
}

impl QualityReport {
    pub fn count(&self, anomaly: Anomaly) -> usize {
        self.counts.get(&anomaly).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.flagged_rows == 0
    }
}

impl Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} rows flagged", self.flagged_rows, self.total_rows)?;
        for (anomaly, count) in self.counts.iter().filter(|(_, c)| **c > 0) {
            write!(f, ", {anomaly}: {count}")?;
        }
        Ok(())
    }
}

///
/// Count anomalies and build a cleaned copy with every flagged row removed.
/// The input table is never rejected, whatever it contains.
///
pub fn scan(rs: &RegionSet) -> (QualityReport, RegionSet) {
    scan_with(rs, &ScanOptions::default())
}

pub fn scan_with(rs: &RegionSet, options: &ScanOptions) -> (QualityReport, RegionSet) {
    let mut report = QualityReport {
        total_rows: rs.len(),
        ..Default::default()
    };
    let mut kept: Vec<Region> = Vec::with_capacity(rs.len());

    for region in &rs.regions {
        let anomalies = classify(region);
        for anomaly in &anomalies {
            *report.counts.entry(*anomaly).or_insert(0) += 1;
        }

        if anomalies.is_empty() {
            kept.push(region.clone());
            continue;
        }
        report.flagged_rows += 1;

        let only_inverted = anomalies == [Anomaly::InvertedCoordinates];
        if only_inverted && options.inverted == InvertedPolicy::Swap && region.is_inverted() {
            let mut swapped = region.clone();
            std::mem::swap(&mut swapped.start, &mut swapped.end);
            debug!("Swapping inverted coordinates of {}", region.chr);
            kept.push(swapped);
        }
    }

    if !report.is_clean() {
        info!("Quality scan: {report}");
    }

    (report, rs.derive(kept))
}
