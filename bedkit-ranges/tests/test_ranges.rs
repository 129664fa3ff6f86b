//! End-to-end checks of the interval engines on the shared BED fixtures and on
//! randomly generated tables.

use std::path::PathBuf;

use bedkit_core::models::{Region, RegionSet};
use bedkit_ranges::intersect::{EmptyReason, Interval, OutputLayout, ScanBackend};
use bedkit_ranges::quality::Anomaly;
use bedkit_ranges::sort::is_sorted;
use bedkit_ranges::{BedOperations, IntersectOptions, Intersector, NoProgress};
use fxhash::FxHashSet;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::*;

fn data_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/data/bedkit")
        .join(file_name)
}

#[fixture]
fn a_bed() -> RegionSet {
    RegionSet::try_from(data_path("a.bed")).unwrap()
}

#[fixture]
fn b_bed() -> RegionSet {
    RegionSet::try_from(data_path("b.bed")).unwrap()
}

fn random_regionset(seed: u64, n: usize) -> RegionSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let chroms = ["chr1", "chr2", "chr10", "chrX"];
    let regions: Vec<Region> = (0..n)
        .map(|_| {
            let chr = chroms[rng.gen_range(0..chroms.len())];
            let start = rng.gen_range(0..1_000);
            let end = start + rng.gen_range(0..80);
            Region::new(chr, start, end)
        })
        .collect();
    RegionSet::from(regions)
}

#[rstest]
fn test_intersect_fixtures(a_bed: RegionSet, b_bed: RegionSet) {
    let outcome = a_bed.intersect(&b_bed, &IntersectOptions::default()).unwrap();
    let table = outcome.table().unwrap();

    assert_eq!(table.layout, OutputLayout::Pairs);
    assert_eq!(
        table.to_tsv_string(),
        "chr1\t0\t100\tchr1\t50\t150\nchr1\t150\t200\tchr1\t190\t300\n"
    );
}

#[rstest]
fn test_intersect_fixtures_inverted(a_bed: RegionSet, b_bed: RegionSet) {
    let options = IntersectOptions {
        v: true,
        ..Default::default()
    };
    let outcome = a_bed.intersect(&b_bed, &options).unwrap();
    assert_eq!(
        outcome.table().unwrap().to_tsv_string(),
        "chr2\t10\t20\nchr3\t5\t15\n"
    );
}

#[rstest]
fn test_merge_fixture_keeps_seed_names() {
    let rs = RegionSet::try_from(data_path("unsorted.bed")).unwrap();
    assert_eq!(
        rs.merge().to_bed_string(),
        "chr1\t10\t28\ta\nchr1\t30\t40\tb\nchr2\t5\t9\tc\n"
    );
}

#[rstest]
fn test_scan_messy_fixture() {
    let rs = RegionSet::try_from(data_path("messy.bed")).unwrap();
    assert!(rs.check_order().is_err());

    let (report, cleaned) = rs.scan();
    assert_eq!(report.total_rows, 6);
    assert_eq!(report.flagged_rows, 3);
    assert_eq!(report.count(Anomaly::Unplaced), 1);
    assert_eq!(report.count(Anomaly::Random), 1);
    assert_eq!(report.count(Anomaly::InvertedCoordinates), 1);
    assert_eq!(report.count(Anomaly::MissingCoordinates), 1);

    assert_eq!(cleaned.len(), 3);
    assert!(cleaned.check_order().is_ok());
    assert!(cleaned.scan().0.is_clean());
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_sort_is_idempotent(#[case] seed: u64) {
    let rs = random_regionset(seed, 200);
    let once = rs.sort();
    assert!(is_sorted(&once));
    assert_eq!(once.sort(), once);
    assert_eq!(once.len(), rs.len());
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
fn test_merge_is_idempotent_and_maximal(#[case] seed: u64) {
    let merged = random_regionset(seed, 200).merge();
    assert_eq!(merged.merge(), merged);

    for pair in merged.regions.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.chr == next.chr {
            assert!(next.start > current.end, "{current} touches {next}");
        }
    }
}

#[rstest]
#[case(3)]
#[case(11)]
fn test_every_a_row_classified_once(#[case] seed: u64) {
    let a = random_regionset(seed, 150);
    let b = random_regionset(seed + 100, 150);

    let wa_only = IntersectOptions {
        wb: false,
        ..Default::default()
    };
    let overlapping: FxHashSet<Interval> = a
        .intersect(&b, &wa_only)
        .unwrap()
        .table()
        .map(|t| t.records.iter().filter_map(|r| r.a.clone()).collect())
        .unwrap_or_default();

    let inverted = IntersectOptions {
        v: true,
        ..Default::default()
    };
    let not_overlapping = a.intersect(&b, &inverted).unwrap().len();

    let overlapping_rows = a
        .regions
        .iter()
        .filter_map(Interval::from_region)
        .filter(|interval| overlapping.contains(interval))
        .count();

    assert_eq!(overlapping_rows + not_overlapping, a.len());
}

#[rstest]
fn test_wa_only_reports_each_distinct_triple_once() {
    let a = RegionSet::from_bed_str("chr1\t0\t100\tx\nchr1\t0\t100\ty\n").unwrap();
    let b = RegionSet::from_bed_str("chr1\t50\t60\n").unwrap();
    let options = IntersectOptions {
        wb: false,
        ..Default::default()
    };
    let outcome = a.intersect(&b, &options).unwrap();
    assert_eq!(outcome.table().unwrap().to_tsv_string(), "chr1\t0\t100\n");

    let options = IntersectOptions {
        wa: false,
        ..Default::default()
    };
    let outcome = b.intersect(&a, &options).unwrap();
    assert_eq!(outcome.table().unwrap().to_tsv_string(), "chr1\t0\t100\n");
}

#[rstest]
#[case(5)]
#[case(23)]
fn test_pair_count_matches_brute_force(#[case] seed: u64) {
    let a = random_regionset(seed, 120);
    let b = random_regionset(seed * 3, 120);

    let expected = a
        .regions
        .iter()
        .flat_map(|x| b.regions.iter().map(move |y| (x, y)))
        .filter(|(x, y)| {
            x.chr == y.chr && y.start < x.end && y.end > x.start && {
                let lo = x.start.max(y.start);
                let hi = x.end.min(y.end);
                hi > lo
            }
        })
        .count();

    let outcome = a.intersect(&b, &IntersectOptions::default()).unwrap();
    assert_eq!(outcome.len(), expected);

    let scan = Intersector::with_backend(Box::new(ScanBackend))
        .run(&a, &b, &IntersectOptions::default(), &mut NoProgress)
        .unwrap();
    assert_eq!(scan, outcome);
}

#[rstest]
fn test_touching_fixture_rows_do_not_intersect() {
    let a = RegionSet::from_bed_str("chr1\t0\t10\n").unwrap();
    let b = RegionSet::from_bed_str("chr1\t10\t20\n").unwrap();
    let outcome = a.intersect(&b, &IntersectOptions::default()).unwrap();
    assert_eq!(outcome.empty_reason(), Some(EmptyReason::NoOverlaps));
}
