//! Interval algebra over BED tables.
//!
//! Every operation here is a pure function of its input [`RegionSet`]s: the inputs are
//! never modified and a fresh table (or report) is returned.
//!
//! - [`sort`](sort::sort): stable lexical `(chrom, start, end)` ordering
//! - [`merge`](merge::merge): collapse overlapping or touching intervals per chromosome
//! - [`intersect`](intersect::intersect): pairwise overlaps between two tables, with
//!   pluggable overlap backends, progress reporting and cancellation
//! - [`scan`](quality::scan): flag non-canonical contigs and inverted rows
//! - [`summarize`](summary::summarize): size and coverage statistics
//!
//! # Example
//!
//! ```
//! use bedkit_core::models::RegionSet;
//! use bedkit_ranges::BedOperations;
//!
//! let rs = RegionSet::from_bed_str("chr1\t15\t25\nchr1\t10\t20\nchr1\t30\t40\n").unwrap();
//! let merged = rs.merge();
//! assert_eq!(merged.to_bed_string(), "chr1\t10\t25\nchr1\t30\t40\n");
//! ```

pub mod errors;
pub mod intersect;
pub mod merge;
pub mod quality;
pub mod sort;
pub mod summary;

use bedkit_core::models::RegionSet;

// re-exports
pub use errors::IntersectError;
pub use intersect::{
    BackendKind, CancellationToken, IntersectOptions, IntersectOutcome, Intersector, NoProgress,
    Progress,
};
pub use quality::{QualityReport, ScanOptions};
pub use summary::RegionSetSummary;

/// The table-level operations, callable as methods on a [`RegionSet`].
pub trait BedOperations {
    /// A sorted copy. See [`sort::sort`].
    fn sort(&self) -> RegionSet;

    /// Maximal non-touching spans per chromosome. See [`merge::merge`].
    fn merge(&self) -> RegionSet;

    /// Overlaps against `other` using the default in-process backend.
    fn intersect(
        &self,
        other: &RegionSet,
        options: &IntersectOptions,
    ) -> Result<IntersectOutcome, IntersectError>;

    /// Anomaly report and a cleaned copy. See [`quality::scan`].
    fn scan(&self) -> (QualityReport, RegionSet);

    fn summarize(&self, genome_size: u64) -> RegionSetSummary;
}

impl BedOperations for RegionSet {
    fn sort(&self) -> RegionSet {
        sort::sort(self)
    }

    fn merge(&self) -> RegionSet {
        merge::merge(self)
    }

    fn intersect(
        &self,
        other: &RegionSet,
        options: &IntersectOptions,
    ) -> Result<IntersectOutcome, IntersectError> {
        intersect::intersect(self, other, options)
    }

    fn scan(&self) -> (QualityReport, RegionSet) {
        quality::scan(self)
    }

    fn summarize(&self, genome_size: u64) -> RegionSetSummary {
        summary::summarize(self, genome_size)
    }
}
