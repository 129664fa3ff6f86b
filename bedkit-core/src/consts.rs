pub const DELIMITER: char = '\t';
pub const COMMENT_PREFIX: &str = "#";
pub const TRACK_PREFIX: &str = "track";
pub const BROWSER_PREFIX: &str = "browser";

/// Written in place of a missing cell.
pub const MISSING: &str = ".";

pub const GZ_FILE_EXTENSION: &str = "gz";
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const MIN_BED_COLUMNS: usize = 3;
pub const MAX_BED_COLUMNS: usize = 12;

/// Canonical BED column names, in positional order.
pub const BED_COLUMNS: [&str; MAX_BED_COLUMNS] = [
    "chrom",
    "start",
    "end",
    "name",
    "score",
    "strand",
    "thickStart",
    "thickEnd",
    "itemRgb",
    "blockCount",
    "blockSizes",
    "blockStarts",
];
