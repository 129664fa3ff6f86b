use std::fmt::{self, Display};
use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::consts::{
    BROWSER_PREFIX, COMMENT_PREFIX, DELIMITER, MIN_BED_COLUMNS, MISSING, TRACK_PREFIX,
};
use crate::errors::RegionSetError;
use crate::models::{BedSchema, Region};
use crate::utils::{
    decode_bytes, get_dynamic_reader, get_dynamic_reader_w_stdin, get_dynamic_writer,
};

///
/// RegionSet struct, the representation of one BED table.
///
/// Every region carries exactly `schema.extra_width()` cells in `rest`. The set is
/// never sorted or cleaned in place; sort, merge and clean operations build a new
/// set with [RegionSet::derive].
///
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub schema: BedSchema,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

/// How strictly [RegionSet::load] treats rows with `start > end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail the load with [RegionSetError::InvertedCoordinates] instead of keeping the rows.
    pub reject_inverted: bool,
}

/// Line-by-line BED parser. The first data line fixes the table width.
struct BedParser {
    schema: Option<BedSchema>,
    header: Vec<String>,
    regions: Vec<Region>,
}

impl BedParser {
    fn new() -> Self {
        BedParser {
            schema: None,
            header: Vec::new(),
            regions: Vec::new(),
        }
    }

    fn push_line(&mut self, line_number: usize, line: &str) -> Result<(), RegionSetError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        if line.starts_with(COMMENT_PREFIX)
            || line.starts_with(TRACK_PREFIX)
            || line.starts_with(BROWSER_PREFIX)
        {
            self.header.push(line.to_string());
            return Ok(());
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();

        let schema = match self.schema {
            Some(schema) => schema,
            None => {
                if fields.len() < MIN_BED_COLUMNS {
                    return Err(RegionSetError::TooFewColumns {
                        line: line_number,
                        found: fields.len(),
                    });
                }
                let schema = BedSchema::clamped(fields.len());
                self.schema = Some(schema);
                schema
            }
        };

        let rest = (MIN_BED_COLUMNS..schema.width())
            .map(|i| {
                fields
                    .get(i)
                    .map(|cell| cell.trim())
                    .filter(|cell| !cell.is_empty() && *cell != MISSING)
                    .map(str::to_string)
            })
            .collect();

        self.regions.push(Region {
            chr: fields[0].trim().to_string(),
            start: parse_coordinate(fields.get(1)),
            end: parse_coordinate(fields.get(2)),
            rest,
        });

        Ok(())
    }

    fn finish(self, source: &str) -> Result<RegionSet, RegionSetError> {
        let schema = self
            .schema
            .ok_or_else(|| RegionSetError::EmptyInput(source.to_string()))?;

        debug!(
            "Parsed {} regions with {} columns from {}",
            self.regions.len(),
            schema.width(),
            source
        );

        Ok(RegionSet {
            regions: self.regions,
            schema,
            header: match self.header.is_empty() {
                true => None,
                false => Some(self.header.join("\n")),
            },
            path: None,
        })
    }
}

/// Non-numeric, negative or absent cells become a missing coordinate.
fn parse_coordinate(cell: Option<&&str>) -> Option<u32> {
    cell.and_then(|s| s.trim().parse::<u32>().ok())
}

impl RegionSet {
    ///
    /// Parse BED text. Fails only when the text can't be read as a table.
    ///
    pub fn from_bed_str(text: &str) -> Result<Self, RegionSetError> {
        let mut parser = BedParser::new();
        for (i, line) in text.lines().enumerate() {
            parser.push_line(i + 1, line)?;
        }
        parser.finish("<text>")
    }

    ///
    /// Parse raw bytes, plain or gzip compressed.
    ///
    pub fn from_bed_bytes(raw: &[u8]) -> Result<Self, RegionSetError> {
        let text = decode_bytes(raw)?;
        RegionSet::from_bed_str(&text)
    }

    ///
    /// Parse BED records from any buffered reader.
    ///
    /// # Arguments
    /// - reader: source of the records
    /// - source: name used in log and error messages
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self, RegionSetError> {
        let mut parser = BedParser::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => RegionSetError::InvalidUtf8(format!("{source}: {e}")),
                _ => RegionSetError::Io(e),
            })?;
            parser.push_line(i + 1, &line)?;
        }
        parser.finish(source)
    }

    ///
    /// Load a bed file and apply the requested order policy.
    ///
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, RegionSetError> {
        let rs = RegionSet::try_from(path.as_ref())?;
        if options.reject_inverted {
            rs.check_order()?;
        }
        Ok(rs)
    }

    ///
    /// Build a new set over `regions` that keeps this set's schema.
    ///
    pub fn derive(&self, regions: Vec<Region>) -> RegionSet {
        let extra = self.schema.extra_width();
        let regions = regions
            .into_iter()
            .map(|mut r| {
                r.rest.resize(extra, None);
                r
            })
            .collect();

        RegionSet {
            regions,
            schema: self.schema,
            header: None,
            path: None,
        }
    }

    ///
    /// Get number of regions in RegionSet
    ///
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    ///
    /// Row indices of regions with `start > end`.
    ///
    pub fn inverted_rows(&self) -> Vec<usize> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_inverted())
            .map(|(i, _)| i)
            .collect()
    }

    ///
    /// Report inverted rows as an order error. The set itself is left untouched so
    /// the caller can still decide to clean it.
    ///
    pub fn check_order(&self) -> Result<(), RegionSetError> {
        let inverted = self.inverted_rows();
        match inverted.first() {
            None => Ok(()),
            Some(&first_row) => Err(RegionSetError::InvertedCoordinates {
                count: inverted.len(),
                first_row,
            }),
        }
    }

    ///
    /// Get total nucleotide count over regions that can be placed on the genome
    ///
    pub fn nucleotides_length(&self) -> u64 {
        self.regions
            .iter()
            .filter_map(Region::width)
            .map(u64::from)
            .sum()
    }

    ///
    /// Write the set as BED text: no header row, one region per line
    ///
    pub fn write_bed<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for region in &self.regions {
            writeln!(writer, "{}", region.as_string())?;
        }
        Ok(())
    }

    pub fn to_bed_string(&self) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        match self.write_bed(&mut buffer) {
            Ok(()) => String::from_utf8(buffer).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    ///
    /// Save a regionset to disk as bed file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to; gzipped when it ends in `.gz`
    pub fn to_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();
        if path.exists() {
            debug!("Overwriting existing file {}", path.display());
        }

        let mut writer = get_dynamic_writer(Some(path))?;
        self.write_bed(&mut writer)?;
        writer.flush()
    }

}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk, optionally gzipped, or `-` for stdin.
    fn try_from(value: &Path) -> Result<Self, RegionSetError> {
        let reader = if value == Path::new("-") {
            get_dynamic_reader_w_stdin("-")?
        } else {
            get_dynamic_reader(value)?
        };

        let mut rs = RegionSet::from_reader(reader, &value.display().to_string())?;
        rs.path = Some(value.to_owned());
        Ok(rs)
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> Result<Self, RegionSetError> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<String> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: String) -> Result<Self, RegionSetError> {
        RegionSet::try_from(Path::new(&value))
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> Result<Self, RegionSetError> {
        RegionSet::try_from(value.as_path())
    }
}

impl From<Vec<Region>> for RegionSet {
    /// The schema is wide enough for the widest region; narrower regions are padded.
    fn from(regions: Vec<Region>) -> Self {
        let widest = regions.iter().map(|r| r.rest.len()).max().unwrap_or(0);
        let template = RegionSet {
            regions: Vec::new(),
            schema: BedSchema::clamped(MIN_BED_COLUMNS + widest),
            header: None,
            path: None,
        };
        let mut rs = template.derive(regions);
        let extra = rs.schema.extra_width();
        for region in rs.regions.iter_mut() {
            region.rest.truncate(extra);
        }
        rs
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionSet with {} regions.", self.len())
    }
}
