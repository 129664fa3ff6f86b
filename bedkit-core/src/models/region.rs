use std::fmt::{self, Display};

use crate::consts::{DELIMITER, MISSING};

///
/// Region struct, one row of a BED table.
///
/// `start` and `end` are `None` when the source cell could not be read as a
/// non-negative integer. `rest` holds the columns after `end`, positionally, with
/// `None` for empty or absent cells.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: Option<u32>,
    pub end: Option<u32>,

    pub rest: Vec<Option<String>>,
}

impl Region {
    pub fn new(chr: &str, start: u32, end: u32) -> Self {
        Region {
            chr: chr.to_string(),
            start: Some(start),
            end: Some(end),
            rest: Vec::new(),
        }
    }

    ///
    /// Both coordinates, when both are present.
    ///
    pub fn coords(&self) -> Option<(u32, u32)> {
        Some((self.start?, self.end?))
    }

    pub fn has_missing_coords(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    /// `start > end`. Regions with a missing coordinate are never inverted.
    pub fn is_inverted(&self) -> bool {
        matches!(self.coords(), Some((start, end)) if start > end)
    }

    ///
    /// Coordinates present and ordered, i.e. the region can be placed on the genome.
    ///
    pub fn is_well_formed(&self) -> bool {
        matches!(self.coords(), Some((start, end)) if start <= end)
    }

    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> Option<u32> {
        match self.coords() {
            Some((start, end)) if start <= end => Some(end - start),
            _ => None,
        }
    }

    ///
    /// Get a cell by its zero-based column position, rendered as text.
    ///
    pub fn field(&self, index: usize) -> Option<String> {
        match index {
            0 => Some(self.chr.clone()),
            1 => self.start.map(|s| s.to_string()),
            2 => self.end.map(|e| e.to_string()),
            _ => self.rest.get(index - 3).cloned().flatten(),
        }
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        let mut line = String::with_capacity(self.chr.len() + 24);
        line.push_str(&self.chr);
        for cell in [self.start, self.end] {
            line.push(DELIMITER);
            match cell {
                Some(v) => line.push_str(&v.to_string()),
                None => line.push_str(MISSING),
            }
        }
        for cell in &self.rest {
            line.push(DELIMITER);
            line.push_str(cell.as_deref().unwrap_or(MISSING));
        }
        line
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_width_and_coords() {
        let r = Region::new("chr1", 10, 25);
        assert_eq!(r.coords(), Some((10, 25)));
        assert_eq!(r.width(), Some(15));
        assert!(r.is_well_formed());
        assert!(!r.is_inverted());
    }

    #[rstest]
    fn test_inverted_region() {
        let r = Region::new("chr1", 30, 20);
        assert!(r.is_inverted());
        assert!(!r.is_well_formed());
        assert_eq!(r.width(), None);
    }

    #[rstest]
    fn test_missing_coordinate() {
        let r = Region {
            chr: "chr1".to_string(),
            start: Some(5),
            end: None,
            rest: vec![],
        };
        assert!(r.has_missing_coords());
        assert!(!r.is_inverted());
        assert!(!r.is_well_formed());
        assert_eq!(r.as_string(), "chr1\t5\t.");
    }

    #[rstest]
    fn test_as_string_with_rest() {
        let r = Region {
            chr: "chr2".to_string(),
            start: Some(0),
            end: Some(100),
            rest: vec![Some("peak".to_string()), None, Some("+".to_string())],
        };
        assert_eq!(r.as_string(), "chr2\t0\t100\tpeak\t.\t+");
        assert_eq!(r.field(3), Some("peak".to_string()));
        assert_eq!(r.field(4), None);
        assert_eq!(r.field(9), None);
    }
}
