use std::fmt::{self, Display};

use crate::consts::{BED_COLUMNS, MAX_BED_COLUMNS, MIN_BED_COLUMNS};
use crate::errors::RegionSetError;

///
/// Column layout shared by every row of a [RegionSet](crate::models::RegionSet).
///
/// Columns are named positionally from the canonical 12-column BED layout, so a
/// 6-column table is `chrom, start, end, name, score, strand`.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BedSchema {
    width: usize,
}

impl BedSchema {
    pub fn new(width: usize) -> Result<Self, RegionSetError> {
        if (MIN_BED_COLUMNS..=MAX_BED_COLUMNS).contains(&width) {
            Ok(BedSchema { width })
        } else {
            Err(RegionSetError::InvalidSchema(width))
        }
    }

    /// Schema for a table carrying `n_fields` columns, surplus columns dropped.
    pub(crate) fn clamped(n_fields: usize) -> Self {
        BedSchema {
            width: n_fields.clamp(MIN_BED_COLUMNS, MAX_BED_COLUMNS),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of columns after chrom, start and end.
    pub fn extra_width(&self) -> usize {
        self.width - MIN_BED_COLUMNS
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        &BED_COLUMNS[..self.width]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|c| *c == name)
    }
}

impl Default for BedSchema {
    fn default() -> Self {
        BedSchema {
            width: MIN_BED_COLUMNS,
        }
    }
}

impl Display for BedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_names().join("\t"))
    }
}
