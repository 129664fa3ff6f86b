use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::consts::{GZ_FILE_EXTENSION, GZIP_MAGIC};
use crate::errors::RegionSetError;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, RegionSetError> {
    let is_gzipped = path.extension() == Some(OsStr::new(GZ_FILE_EXTENSION));
    let file = File::open(path)
        .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(
    file_path_str: &str,
) -> Result<BufReader<Box<dyn Read>>, RegionSetError> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Get a writer for a file path or stdout. Paths ending in `.gz` are gzip compressed.
///
/// # Arguments
///
/// - path: output path; `None` or `-` writes to stdout
///
pub fn get_dynamic_writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    let path = match path {
        Some(p) if p != Path::new("-") => p,
        _ => return Ok(Box::new(BufWriter::new(io::stdout()))),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = BufWriter::new(File::create(path)?);
    if path.extension() == Some(OsStr::new(GZ_FILE_EXTENSION)) {
        Ok(Box::new(GzEncoder::new(file, Compression::default())))
    } else {
        Ok(Box::new(file))
    }
}

/// Does the buffer start with the gzip magic number?
pub fn is_gzipped(raw: &[u8]) -> bool {
    raw.starts_with(&GZIP_MAGIC)
}

///
/// Decode raw input bytes into text, inflating them first when they are gzip compressed.
///
pub fn decode_bytes(raw: &[u8]) -> Result<String, RegionSetError> {
    let bytes = if is_gzipped(raw) {
        let mut inflated = Vec::new();
        MultiGzDecoder::new(raw).read_to_end(&mut inflated)?;
        inflated
    } else {
        raw.to_vec()
    };

    String::from_utf8(bytes).map_err(|e| RegionSetError::InvalidUtf8(e.to_string()))
}
