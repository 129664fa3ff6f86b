use bedkit_core::models::{Region, RegionSet};
use log::{debug, warn};

use crate::sort::compare_regions;

///
/// Collapse overlapping or touching intervals on each chromosome into maximal spans.
///
/// The input is sorted internally, so caller order does not matter. Two neighbours are
/// joined when `next.start <= current.end`. The annotation columns of a merged span are
/// the ones of the record that opened it. Rows with a missing or inverted coordinate
/// are left out.
///
/// # Example
/// ```text
/// input:  chr1 10 20, chr1 15 25, chr1 25 28, chr1 30 40
/// output: chr1 10 28, chr1 30 40
/// ```
pub fn merge(rs: &RegionSet) -> RegionSet {
    let mut regions: Vec<&Region> = rs.regions.iter().filter(|r| r.is_well_formed()).collect();

    let skipped = rs.len() - regions.len();
    if skipped > 0 {
        warn!("Skipping {skipped} region(s) with missing or inverted coordinates during merge");
    }

    regions.sort_by(|a, b| compare_regions(a, b));

    let mut merged: Vec<Region> = Vec::new();
    let mut iter = regions.into_iter();

    let Some(first) = iter.next() else {
        return rs.derive(merged);
    };

    let mut current = first.clone();
    for region in iter {
        // well-formed rows only, so both coordinates are present
        let (Some(start), Some(end), Some(current_end)) = (region.start, region.end, current.end)
        else {
            continue;
        };

        if region.chr == current.chr && start <= current_end {
            current.end = Some(current_end.max(end));
        } else {
            merged.push(std::mem::replace(&mut current, region.clone()));
        }
    }
    merged.push(current);

    debug!("Merged {} regions into {}", rs.len() - skipped, merged.len());

    rs.derive(merged)
}
