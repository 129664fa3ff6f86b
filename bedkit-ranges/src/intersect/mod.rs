//! Pairwise overlaps between two BED tables.
//!
//! Only the chrom/start/end triple of each row takes part. Rows that can't be placed on
//! the genome (a missing or inverted coordinate) are left out of both inputs. Candidate
//! pairs come from an [OverlapBackend]; the engine then applies the overlap length,
//! the minimum fraction, deduplication and the output projection the same way for
//! every backend.

pub mod backend;
pub mod bedtools;
pub mod progress;
pub mod table;

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use bedkit_core::models::RegionSet;
use fxhash::FxHashSet;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::IntersectError;

pub use backend::{BackendKind, OverlapBackend, ScanBackend, SweepBackend};
pub use bedtools::BedtoolsBackend;
pub use progress::{CancellationToken, NoProgress, Progress};
pub use table::{IntersectRecord, IntersectTable, Interval, OutputLayout};

///
/// Reporting options of an intersection.
///
/// - `wa`: report the A interval
/// - `wb`: report the B interval
/// - `wo`: report both intervals and the overlap length
/// - `v`: report A intervals with no overlap instead of overlapping pairs
/// - `f`: minimum overlap, as a fraction of the A interval's length
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectOptions {
    pub wa: bool,
    pub wb: bool,
    pub wo: bool,
    pub v: bool,
    pub f: f64,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        IntersectOptions {
            wa: true,
            wb: true,
            wo: false,
            v: false,
            f: 0.0,
        }
    }
}

impl IntersectOptions {
    pub fn validate(&self) -> Result<(), IntersectError> {
        match (0.0..=1.0).contains(&self.f) {
            true => Ok(()),
            false => Err(IntersectError::InvalidFraction(self.f)),
        }
    }

    /// First match wins: `v`, `wo`, `wa` and `wb`, `wa`, `wb`, then `wa` again.
    pub fn layout(&self) -> OutputLayout {
        if self.v {
            OutputLayout::NonOverlappingA
        } else if self.wo {
            OutputLayout::PairsWithOverlap
        } else if self.wa && self.wb {
            OutputLayout::Pairs
        } else if self.wb && !self.wa {
            OutputLayout::BOnly
        } else {
            OutputLayout::AOnly
        }
    }

    fn accepts(&self, overlap: u32, a_len: u32) -> bool {
        if overlap == 0 {
            return false;
        }
        self.f <= 0.0 || f64::from(overlap) / f64::from(a_len) >= self.f
    }
}

/// Why an intersection produced no rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EmptyReason {
    /// A, or B outside `v` mode, has no placeable rows.
    EmptyInput,
    NoSharedChromosomes,
    NoOverlaps,
    /// `v` mode and every A row overlaps something.
    AllOverlapped,
}

impl Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            EmptyReason::EmptyInput => "an input has no placeable intervals",
            EmptyReason::NoSharedChromosomes => "the inputs share no chromosome",
            EmptyReason::NoOverlaps => "no pair of intervals overlaps",
            EmptyReason::AllOverlapped => "every interval in A overlaps B",
        };
        write!(f, "{reason}")
    }
}

///
/// The result of an intersection. An empty result is a valid outcome, not an error.
///
#[derive(Clone, Debug, PartialEq)]
pub enum IntersectOutcome {
    Overlaps(IntersectTable),
    Empty(EmptyReason),
}

impl IntersectOutcome {
    pub fn table(&self) -> Option<&IntersectTable> {
        match self {
            IntersectOutcome::Overlaps(table) => Some(table),
            IntersectOutcome::Empty(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.table().map_or(0, IntersectTable::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            IntersectOutcome::Overlaps(_) => None,
            IntersectOutcome::Empty(reason) => Some(*reason),
        }
    }
}

/// Placeable rows of one chromosome, in input order.
#[derive(Default)]
struct ChromGroup {
    rows: Vec<usize>,
    intervals: Vec<Interval>,
}

fn group_by_chrom(rs: &RegionSet, side: &str) -> BTreeMap<String, ChromGroup> {
    let mut groups: BTreeMap<String, ChromGroup> = BTreeMap::new();
    let mut skipped = 0;

    for (row, region) in rs.regions.iter().enumerate() {
        match Interval::from_region(region) {
            Some(interval) => {
                let group = groups.entry(interval.chrom.clone()).or_default();
                group.rows.push(row);
                group.intervals.push(interval);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Excluding {skipped} row(s) of {side} with missing or inverted coordinates");
    }

    groups
}

/// One qualifying pair. `a_row` is the A interval's row in the input table.
struct Match<'a> {
    a_row: usize,
    a: &'a Interval,
    b: &'a Interval,
    overlap: u32,
}

///
/// Runs intersections on a chosen backend. The in-process sweep stands in whenever the
/// backend fails on a chromosome group.
///
pub struct Intersector {
    backend: Box<dyn OverlapBackend>,
    fallback: SweepBackend,
    cancel: CancellationToken,
}

impl Default for Intersector {
    fn default() -> Self {
        Intersector::with_backend(Box::new(SweepBackend))
    }
}

impl Intersector {
    pub fn new(kind: BackendKind) -> Result<Self, IntersectError> {
        Ok(Intersector::with_backend(kind.build()?))
    }

    pub fn with_backend(backend: Box<dyn OverlapBackend>) -> Self {
        Intersector {
            backend,
            fallback: SweepBackend,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn candidates(
        &self,
        chrom: &str,
        a: &[Interval],
        b: &[Interval],
    ) -> Result<Vec<(usize, usize)>, IntersectError> {
        match self.backend.overlaps(chrom, a, b) {
            Ok(pairs) => Ok(pairs),
            Err(e) => {
                warn!(
                    "{} backend failed on {chrom} ({e}), falling back to {}",
                    self.backend.name(),
                    self.fallback.name()
                );
                self.fallback.overlaps(chrom, a, b)
            }
        }
    }

    ///
    /// Intersect `a` with `b`.
    ///
    /// Shared chromosomes are visited in lexical order; within one chromosome rows
    /// follow A's input order, then B's. `progress` hears about every finished
    /// chromosome group, and the cancellation token is checked before each group.
    ///
    /// # Arguments
    /// - a: the query table
    /// - b: the table searched for overlaps
    /// - options: reporting options
    /// - progress: receiver of `(done, total)` updates
    pub fn run(
        &self,
        a: &RegionSet,
        b: &RegionSet,
        options: &IntersectOptions,
        progress: &mut dyn Progress,
    ) -> Result<IntersectOutcome, IntersectError> {
        options.validate()?;

        let a_groups = group_by_chrom(a, "A");
        let b_groups = group_by_chrom(b, "B");

        if a_groups.is_empty() || (!options.v && b_groups.is_empty()) {
            return Ok(empty(EmptyReason::EmptyInput));
        }

        let shared: Vec<&String> = a_groups
            .keys()
            .filter(|chrom| b_groups.contains_key(*chrom))
            .collect();

        if shared.is_empty() && !options.v {
            return Ok(empty(EmptyReason::NoSharedChromosomes));
        }

        let total = shared.len();
        let mut matches: Vec<Match> = Vec::new();

        for (done, chrom) in shared.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(IntersectError::Cancelled { done, total });
            }

            let (Some(a_group), Some(b_group)) = (a_groups.get(chrom), b_groups.get(chrom)) else {
                continue;
            };

            let mut pairs = self.candidates(chrom, &a_group.intervals, &b_group.intervals)?;
            pairs.sort_unstable();
            pairs.dedup();

            let before = matches.len();
            for (i, j) in pairs {
                let (Some(query), Some(target)) =
                    (a_group.intervals.get(i), b_group.intervals.get(j))
                else {
                    continue;
                };

                let overlap = query.overlap_len(target);
                if options.accepts(overlap, query.len()) {
                    matches.push(Match {
                        a_row: a_group.rows[i],
                        a: query,
                        b: target,
                        overlap,
                    });
                }
            }

            debug!(
                "{chrom}: {} x {} intervals, {} overlapping pairs",
                a_group.intervals.len(),
                b_group.intervals.len(),
                matches.len() - before
            );
            progress.update(done + 1, total);
        }
        progress.finish();

        let layout = options.layout();
        let records = match layout {
            OutputLayout::NonOverlappingA => non_overlapping(a, &matches),
            _ => project(layout, &matches),
        };

        match (records.is_empty(), layout) {
            (true, OutputLayout::NonOverlappingA) => Ok(empty(EmptyReason::AllOverlapped)),
            (true, _) => Ok(empty(EmptyReason::NoOverlaps)),
            (false, _) => Ok(IntersectOutcome::Overlaps(IntersectTable { layout, records })),
        }
    }
}

fn empty(reason: EmptyReason) -> IntersectOutcome {
    info!("Intersection is empty: {reason}");
    IntersectOutcome::Empty(reason)
}

/// wa-only and wb-only keep each distinct interval once, in order of first appearance.
fn project<'a>(layout: OutputLayout, matches: &[Match<'a>]) -> Vec<IntersectRecord> {
    let mut seen: FxHashSet<&'a Interval> = FxHashSet::default();

    matches
        .iter()
        .filter_map(|m| match layout {
            OutputLayout::Pairs => Some(IntersectRecord {
                a: Some(m.a.clone()),
                b: Some(m.b.clone()),
                overlap: None,
            }),
            OutputLayout::PairsWithOverlap => Some(IntersectRecord {
                a: Some(m.a.clone()),
                b: Some(m.b.clone()),
                overlap: Some(m.overlap),
            }),
            OutputLayout::AOnly => seen.insert(m.a).then(|| IntersectRecord {
                a: Some(m.a.clone()),
                b: None,
                overlap: None,
            }),
            OutputLayout::BOnly => seen.insert(m.b).then(|| IntersectRecord {
                a: None,
                b: Some(m.b.clone()),
                overlap: None,
            }),
            OutputLayout::NonOverlappingA => None,
        })
        .collect()
}

/// Placeable A rows without a qualifying overlap, in A's input order.
fn non_overlapping(a: &RegionSet, matches: &[Match]) -> Vec<IntersectRecord> {
    let overlapped: FxHashSet<usize> = matches.iter().map(|m| m.a_row).collect();

    a.regions
        .iter()
        .enumerate()
        .filter(|(row, _)| !overlapped.contains(row))
        .filter_map(|(_, region)| Interval::from_region(region))
        .map(|interval| IntersectRecord {
            a: Some(interval),
            b: None,
            overlap: None,
        })
        .collect()
}

///
/// Intersect two tables on the in-process sweep, without progress or cancellation.
///
pub fn intersect(
    a: &RegionSet,
    b: &RegionSet,
    options: &IntersectOptions,
) -> Result<IntersectOutcome, IntersectError> {
    Intersector::default().run(a, b, options, &mut NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn bed(text: &str) -> RegionSet {
        RegionSet::from_bed_str(text).unwrap()
    }

    fn tsv(outcome: &IntersectOutcome) -> String {
        outcome
            .table()
            .map(IntersectTable::to_tsv_string)
            .unwrap_or_default()
    }

    struct FailingBackend;

    impl OverlapBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn overlaps(
            &self,
            _chrom: &str,
            _a: &[Interval],
            _b: &[Interval],
        ) -> Result<Vec<(usize, usize)>, IntersectError> {
            Err(IntersectError::Backend {
                backend: "failing",
                message: "boom".to_string(),
            })
        }
    }

    #[fixture]
    fn pair() -> (RegionSet, RegionSet) {
        (
            bed("chr1\t0\t100\n"),
            bed("chr1\t50\t150\nchr2\t0\t10\n"),
        )
    }

    #[rstest]
    fn test_default_reports_pairs(pair: (RegionSet, RegionSet)) {
        let (a, b) = pair;
        let outcome = intersect(&a, &b, &IntersectOptions::default()).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t0\t100\tchr1\t50\t150\n");
    }

    #[rstest]
    fn test_wo_appends_overlap(pair: (RegionSet, RegionSet)) {
        let (a, b) = pair;
        let options = IntersectOptions {
            wo: true,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t0\t100\tchr1\t50\t150\t50\n");
    }

    #[rstest]
    fn test_touching_is_empty() {
        let outcome = intersect(
            &bed("chr1\t0\t10\n"),
            &bed("chr1\t10\t20\n"),
            &IntersectOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome, IntersectOutcome::Empty(EmptyReason::NoOverlaps));
    }

    #[rstest]
    fn test_no_shared_chromosome() {
        let outcome = intersect(
            &bed("chr1\t0\t10\n"),
            &bed("chr2\t0\t10\n"),
            &IntersectOptions::default(),
        )
        .unwrap();
        assert_eq!(
            outcome.empty_reason(),
            Some(EmptyReason::NoSharedChromosomes)
        );
    }

    #[rstest]
    fn test_v_keeps_rows_on_absent_chromosomes() {
        let a = bed("chr3\t5\t6\nchr1\t0\t10\nchr1\t40\t50\n");
        let b = bed("chr1\t5\t15\n");
        let options = IntersectOptions {
            v: true,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr3\t5\t6\nchr1\t40\t50\n");
    }

    #[rstest]
    fn test_v_all_overlapped() {
        let options = IntersectOptions {
            v: true,
            ..Default::default()
        };
        let outcome = intersect(&bed("chr1\t0\t10\n"), &bed("chr1\t5\t6\n"), &options).unwrap();
        assert_eq!(outcome.empty_reason(), Some(EmptyReason::AllOverlapped));
    }

    #[rstest]
    fn test_wa_only_deduplicates() {
        let a = bed("chr1\t0\t100\nchr1\t200\t300\n");
        let b = bed("chr1\t10\t20\nchr1\t30\t40\nchr1\t250\t260\n");
        let options = IntersectOptions {
            wb: false,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t0\t100\nchr1\t200\t300\n");
    }

    #[rstest]
    fn test_wb_only_deduplicates() {
        let a = bed("chr1\t0\t100\nchr1\t10\t90\n");
        let b = bed("chr1\t50\t60\n");
        let options = IntersectOptions {
            wa: false,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t50\t60\n");
    }

    #[rstest]
    fn test_wa_only_deduplicates_equal_triples() {
        let a = bed("chr1\t0\t100\tx\nchr1\t0\t100\ty\n");
        let b = bed("chr1\t50\t60\n");
        let options = IntersectOptions {
            wb: false,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t0\t100\n");
    }

    #[rstest]
    fn test_wb_only_deduplicates_equal_triples() {
        let a = bed("chr1\t0\t100\n");
        let b = bed("chr1\t50\t60\tx\nchr1\t50\t60\ty\nchr1\t50\t60\tz\n");
        let options = IntersectOptions {
            wa: false,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t50\t60\n");
    }

    #[rstest]
    #[case(0.0, 1)]
    #[case(0.5, 1)]
    #[case(0.51, 0)]
    fn test_fraction_of_a(#[case] f: f64, #[case] rows: usize) {
        let options = IntersectOptions {
            f,
            ..Default::default()
        };
        let a = bed("chr1\t0\t100\n");
        let b = bed("chr1\t50\t150\n");
        let outcome = intersect(&a, &b, &options).unwrap();
        assert_eq!(outcome.len(), rows);
    }

    #[rstest]
    #[case::wa_only(true, false, false, 0.5, "")]
    #[case::wa_only_loose(true, false, false, 0.1, "chr1\t0\t100\n")]
    #[case::wb_only(false, true, false, 0.5, "")]
    #[case::wb_only_loose(false, true, false, 0.1, "chr1\t50\t60\n")]
    #[case::wo(true, true, true, 0.5, "")]
    #[case::wo_loose(true, true, true, 0.1, "chr1\t0\t100\tchr1\t50\t60\t10\n")]
    fn test_fraction_applies_to_every_layout(
        #[case] wa: bool,
        #[case] wb: bool,
        #[case] wo: bool,
        #[case] f: f64,
        #[case] expected: &str,
    ) {
        let options = IntersectOptions {
            wa,
            wb,
            wo,
            f,
            ..Default::default()
        };
        let outcome = intersect(&bed("chr1\t0\t100\n"), &bed("chr1\t50\t60\n"), &options).unwrap();
        assert_eq!(tsv(&outcome), expected);
        if expected.is_empty() {
            assert_eq!(outcome.empty_reason(), Some(EmptyReason::NoOverlaps));
        }
    }

    #[rstest]
    fn test_v_reports_rows_below_fraction() {
        let a = bed("chr1\t0\t100\n");
        let b = bed("chr1\t50\t60\n");
        let strict = IntersectOptions {
            v: true,
            f: 0.5,
            ..Default::default()
        };
        let outcome = intersect(&a, &b, &strict).unwrap();
        assert_eq!(tsv(&outcome), "chr1\t0\t100\n");

        let loose = IntersectOptions { f: 0.1, ..strict };
        let outcome = intersect(&a, &b, &loose).unwrap();
        assert_eq!(outcome, IntersectOutcome::Empty(EmptyReason::AllOverlapped));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn test_invalid_fraction(#[case] f: f64) {
        let options = IntersectOptions {
            f,
            ..Default::default()
        };
        let result = intersect(&bed("chr1\t0\t1\n"), &bed("chr1\t0\t1\n"), &options);
        assert!(matches!(result, Err(IntersectError::InvalidFraction(_))));
    }

    #[rstest]
    fn test_malformed_rows_excluded() {
        let a = bed("chr1\t0\t100\nchr1\t90\t10\nchr1\tNA\t50\n");
        let b = bed("chr1\t20\t30\n");
        let options = IntersectOptions {
            v: true,
            ..Default::default()
        };
        assert_eq!(
            intersect(&a, &b, &options).unwrap().empty_reason(),
            Some(EmptyReason::AllOverlapped)
        );
    }

    #[rstest]
    fn test_rows_follow_chrom_then_input_order() {
        let a = bed("chr2\t0\t10\nchr1\t50\t60\nchr1\t0\t10\n");
        let b = bed("chr1\t5\t55\nchr2\t5\t6\nchr1\t0\t1\n");
        let outcome = intersect(&a, &b, &IntersectOptions::default()).unwrap();
        assert_eq!(
            tsv(&outcome),
            "chr1\t50\t60\tchr1\t5\t55\n\
             chr1\t0\t10\tchr1\t5\t55\n\
             chr1\t0\t10\tchr1\t0\t1\n\
             chr2\t0\t10\tchr2\t5\t6\n"
        );
    }

    #[rstest]
    fn test_backends_agree() {
        let a = bed("chr1\t0\t100\nchr1\t150\t200\nchr2\t10\t20\nchr2\t0\t0\n");
        let b = bed("chr1\t50\t160\nchr1\t190\t300\nchr2\t20\t30\nchr2\t5\t15\n");
        let options = IntersectOptions {
            wo: true,
            ..Default::default()
        };

        let scan = Intersector::with_backend(Box::new(ScanBackend))
            .run(&a, &b, &options, &mut NoProgress)
            .unwrap();
        let sweep = Intersector::default()
            .run(&a, &b, &options, &mut NoProgress)
            .unwrap();
        assert_eq!(scan, sweep);
        assert_eq!(scan.len(), 4);
    }

    #[rstest]
    fn test_failing_backend_falls_back(pair: (RegionSet, RegionSet)) {
        let (a, b) = pair;
        let intersector = Intersector::with_backend(Box::new(FailingBackend));
        let outcome = intersector
            .run(&a, &b, &IntersectOptions::default(), &mut NoProgress)
            .unwrap();
        assert_eq!(outcome.len(), 1);
    }

    #[rstest]
    fn test_progress_reported_per_group() {
        let a = bed("chr1\t0\t10\nchr2\t0\t10\nchr3\t0\t10\n");
        let b = bed("chr1\t5\t6\nchr2\t5\t6\n");
        let mut updates = Vec::new();
        let mut progress = |done: usize, total: usize| updates.push((done, total));

        Intersector::default()
            .run(&a, &b, &IntersectOptions::default(), &mut progress)
            .unwrap();
        assert_eq!(updates, vec![(1, 2), (2, 2)]);
    }

    #[rstest]
    fn test_cancelled_before_first_group(pair: (RegionSet, RegionSet)) {
        let (a, b) = pair;
        let token = CancellationToken::new();
        token.cancel();

        let result = Intersector::default().with_cancellation(token).run(
            &a,
            &b,
            &IntersectOptions::default(),
            &mut NoProgress,
        );
        assert!(matches!(
            result,
            Err(IntersectError::Cancelled { done: 0, total: 1 })
        ));
    }
}
