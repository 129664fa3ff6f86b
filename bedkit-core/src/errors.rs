use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionSetError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Input is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Line {line}: a BED record needs at least 3 tab-separated columns, found {found}")]
    TooFewColumns { line: usize, found: usize },

    #[error("No regions found in input: {0}")]
    EmptyInput(String),

    #[error("Invalid column count {0}: BED tables have between 3 and 12 columns")]
    InvalidSchema(usize),

    #[error("{count} region(s) have start > end, first at row index {first_row}")]
    InvertedCoordinates { count: usize, first_row: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RegionSetError {
    /// The input can't be read as a table at all. Nothing is returned to the caller.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            RegionSetError::InvalidUtf8(_)
                | RegionSetError::TooFewColumns { .. }
                | RegionSetError::EmptyInput(_)
                | RegionSetError::InvalidSchema(_)
        )
    }

    /// The table parsed, but some rows are inverted. The caller may reject or clean it.
    pub fn is_order_error(&self) -> bool {
        matches!(self, RegionSetError::InvertedCoordinates { .. })
    }
}
