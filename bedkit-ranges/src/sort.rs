use std::cmp::Ordering;

use bedkit_core::models::{Region, RegionSet};

/// `Some` before `None`, then numeric.
fn compare_coordinate(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

///
/// Order two regions by `(chrom, start, end)`. Chromosomes compare as plain strings, so
/// `chr10` sorts before `chr2`.
///
pub fn compare_regions(a: &Region, b: &Region) -> Ordering {
    a.chr
        .cmp(&b.chr)
        .then_with(|| compare_coordinate(a.start, b.start))
        .then_with(|| compare_coordinate(a.end, b.end))
}

///
/// Return a sorted copy of the set. The sort is stable: rows with equal keys keep
/// their input order.
///
pub fn sort(rs: &RegionSet) -> RegionSet {
    let mut regions = rs.regions.clone();
    regions.sort_by(compare_regions);
    rs.derive(regions)
}

pub fn is_sorted(rs: &RegionSet) -> bool {
    rs.regions
        .windows(2)
        .all(|w| compare_regions(&w[0], &w[1]) != Ordering::Greater)
}
