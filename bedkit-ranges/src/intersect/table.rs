use std::fmt::{self, Display};
use std::io::Write;

use bedkit_core::consts::DELIMITER;
use bedkit_core::models::Region;
use serde::Serialize;

///
/// A placed interval: the chrom/start/end triple the intersection works on.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// The first three columns of `region`, if it can be placed on the genome.
    pub fn from_region(region: &Region) -> Option<Interval> {
        match region.coords() {
            Some((start, end)) if start <= end => Some(Interval {
                chrom: region.chr.clone(),
                start,
                end,
            }),
            _ => None,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    ///
    /// Strict half-open overlap test: intervals that only touch do not overlap.
    /// Chromosomes are not compared.
    ///
    pub fn overlaps(&self, other: &Interval) -> bool {
        other.start < self.end && other.end > self.start
    }

    /// Number of shared bases, zero when the intervals are disjoint.
    pub fn overlap_len(&self, other: &Interval) -> u32 {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.chrom, self.start, self.end
        )
    }
}

///
/// The column set of an intersection result, chosen from the options.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OutputLayout {
    /// A triple, B triple
    Pairs,
    /// A triple, B triple, overlap length
    PairsWithOverlap,
    /// A triple, each distinct overlapping A interval once
    AOnly,
    /// B triple, each distinct overlapping B interval once
    BOnly,
    /// A triple, each A row without an overlap
    NonOverlappingA,
}

impl OutputLayout {
    pub fn column_names(&self) -> &'static [&'static str] {
        match self {
            OutputLayout::Pairs => &[
                "a_chrom", "a_start", "a_end", "b_chrom", "b_start", "b_end",
            ],
            OutputLayout::PairsWithOverlap => &[
                "a_chrom",
                "a_start",
                "a_end",
                "b_chrom",
                "b_start",
                "b_end",
                "overlap_length",
            ],
            OutputLayout::AOnly | OutputLayout::BOnly | OutputLayout::NonOverlappingA => {
                &["chrom", "start", "end"]
            }
        }
    }

    pub fn width(&self) -> usize {
        self.column_names().len()
    }
}

///
/// One output row. Which parts are present follows the table's [OutputLayout].
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntersectRecord {
    pub a: Option<Interval>,
    pub b: Option<Interval>,
    pub overlap: Option<u32>,
}

impl IntersectRecord {
    pub fn as_string(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(a) = &self.a {
            parts.push(a.to_string());
        }
        if let Some(b) = &self.b {
            parts.push(b.to_string());
        }
        if let Some(overlap) = self.overlap {
            parts.push(overlap.to_string());
        }
        parts.join(&DELIMITER.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntersectTable {
    pub layout: OutputLayout,
    pub records: Vec<IntersectRecord>,
}

impl IntersectTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        self.layout.column_names()
    }

    ///
    /// Write the rows tab-separated, without a header row.
    ///
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for record in &self.records {
            writeln!(writer, "{}", record.as_string())?;
        }
        Ok(())
    }

    pub fn to_tsv_string(&self) -> String {
        let mut buf: Vec<u8> = Vec::new();
        match self.write_tsv(&mut buf) {
            Ok(()) => String::from_utf8(buf).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}
