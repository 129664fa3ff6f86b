//! Size and coverage statistics for one table.

use std::collections::BTreeMap;

use bedkit_core::models::{Region, RegionSet};
use fxhash::FxHashSet;
use serde::Serialize;

/// Size of the GRCh38 primary assembly, in bases.
pub const DEFAULT_GENOME_SIZE: u64 = 3_299_210_039;

const STRAND_COLUMN: &str = "strand";

/// Shares of `+`, `-` and any other value among the filled strand cells.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrandFractions {
    pub plus: f64,
    pub minus: f64,
    pub other: f64,
}

///
/// Summary statistics of a [RegionSet].
///
/// Width statistics only cover rows with both coordinates present and `start <= end`.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionSetSummary {
    pub chromosomes: usize,
    pub intervals: usize,
    pub placed_intervals: usize,
    pub intervals_per_chromosome: BTreeMap<String, usize>,
    pub mean_width: f64,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub total_bases: u64,
    pub genome_size: u64,
    /// `total_bases / genome_size`. Overlapping rows count twice.
    pub coverage: f64,
    pub duplicate_rows: usize,
    pub missing_cells: usize,
    pub columns: usize,
    pub strand: Option<StrandFractions>,
}

fn missing_cells(region: &Region) -> usize {
    usize::from(region.start.is_none())
        + usize::from(region.end.is_none())
        + region.rest.iter().filter(|c| c.is_none()).count()
}

fn strand_fractions(rs: &RegionSet) -> Option<StrandFractions> {
    let position = rs.schema.position(STRAND_COLUMN)?;

    let strands: Vec<String> = rs.iter().filter_map(|r| r.field(position)).collect();
    if strands.is_empty() {
        return None;
    }

    let total = strands.len() as f64;
    let share = |value: &str| strands.iter().filter(|s| *s == value).count() as f64 / total;
    let plus = share("+");
    let minus = share("-");

    Some(StrandFractions {
        plus,
        minus,
        other: 1.0 - plus - minus,
    })
}

///
/// Compute summary statistics.
///
/// # Arguments
/// - rs: the table
/// - genome_size: reference size used for the coverage fraction, see [DEFAULT_GENOME_SIZE]
pub fn summarize(rs: &RegionSet, genome_size: u64) -> RegionSetSummary {
    let widths: Vec<u32> = rs.iter().filter_map(Region::width).collect();
    let total_bases = rs.nucleotides_length();

    let mut intervals_per_chromosome: BTreeMap<String, usize> = BTreeMap::new();
    for region in rs {
        *intervals_per_chromosome
            .entry(region.chr.clone())
            .or_insert(0) += 1;
    }

    let mut seen: FxHashSet<&Region> = FxHashSet::default();
    let duplicate_rows = rs.iter().filter(|r| !seen.insert(*r)).count();

    RegionSetSummary {
        chromosomes: intervals_per_chromosome.len(),
        intervals: rs.len(),
        placed_intervals: widths.len(),
        intervals_per_chromosome,
        mean_width: match widths.is_empty() {
            true => 0.0,
            false => total_bases as f64 / widths.len() as f64,
        },
        min_width: widths.iter().min().copied(),
        max_width: widths.iter().max().copied(),
        total_bases,
        genome_size,
        coverage: match genome_size {
            0 => 0.0,
            size => total_bases as f64 / size as f64,
        },
        duplicate_rows,
        missing_cells: rs.iter().map(missing_cells).sum(),
        columns: rs.schema.width(),
        strand: strand_fractions(rs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_summary_of_simple_table() {
        let rs = RegionSet::from_bed_str("chr1\t0\t100\nchr1\t50\t60\nchr2\t0\t40\nchr1\t0\t100\n")
            .unwrap();
        let summary = summarize(&rs, 1000);

        assert_eq!(summary.chromosomes, 2);
        assert_eq!(summary.intervals, 4);
        assert_eq!(summary.total_bases, 250);
        assert_eq!(summary.min_width, Some(10));
        assert_eq!(summary.max_width, Some(100));
        assert_eq!(summary.mean_width, 62.5);
        assert_eq!(summary.coverage, 0.25);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.strand, None);
        assert_eq!(summary.intervals_per_chromosome["chr1"], 3);
    }

    #[rstest]
    fn test_summary_counts_missing_and_strand() {
        let rs = RegionSet::from_bed_str(
            "chr1\t0\t10\ta\t0\t+\n\
             chr1\tNA\t10\tb\t0\t-\n\
             chr1\t5\t9\tc\t0\t+\n\
             chr1\t2\t1\t\t0\t+\n",
        )
        .unwrap();
        let summary = summarize(&rs, DEFAULT_GENOME_SIZE);

        assert_eq!(summary.placed_intervals, 2);
        assert_eq!(summary.missing_cells, 2);

        let strand = summary.strand.unwrap();
        assert_eq!(strand.plus, 0.75);
        assert_eq!(strand.minus, 0.25);
        assert_eq!(strand.other, 0.0);
    }

    #[rstest]
    fn test_summary_of_unplaceable_table() {
        let rs = RegionSet::from_bed_str("chr1\t9\t3\n").unwrap();
        let summary = summarize(&rs, 0);
        assert_eq!(summary.mean_width, 0.0);
        assert_eq!(summary.min_width, None);
        assert_eq!(summary.coverage, 0.0);
    }
}
