use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use log::debug;
use tempfile::NamedTempFile;

use super::backend::OverlapBackend;
use super::table::Interval;
use crate::errors::IntersectError;

const BACKEND_NAME: &str = "bedtools";

///
/// Delegates overlap finding to an external `bedtools intersect`.
///
/// Each chromosome group is written to two temporary BED files whose name column holds
/// the row index, and the index pairs are read back from `-wa -wb` output.
///
#[derive(Clone, Debug)]
pub struct BedtoolsBackend {
    program: PathBuf,
    version: String,
}

impl BedtoolsBackend {
    ///
    /// Capability check against `bedtools` on PATH.
    ///
    pub fn detect() -> Option<Self> {
        Self::detect_program("bedtools")
    }

    pub fn detect_program<P: Into<PathBuf>>(program: P) -> Option<Self> {
        let program = program.into();
        let output = Command::new(&program).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .trim()
            .trim_start_matches("bedtools")
            .trim()
            .to_string();

        Some(BedtoolsBackend { program, version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn write_group(intervals: &[Interval]) -> Result<NamedTempFile, IntersectError> {
        let mut file = NamedTempFile::new()?;
        for (i, interval) in intervals.iter().enumerate() {
            writeln!(file, "{interval}\t{i}")?;
        }
        file.flush()?;
        Ok(file)
    }

    fn failure(message: String) -> IntersectError {
        IntersectError::Backend {
            backend: BACKEND_NAME,
            message,
        }
    }
}

/// `-wa -wb` output of two 4-column files: the A index sits in column 4, the B index in column 8.
fn parse_pairs(stdout: &str) -> Result<Vec<(usize, usize)>, IntersectError> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> Result<(usize, usize), IntersectError> {
            let fields: Vec<&str> = line.split('\t').collect();
            let index = |position: usize| {
                fields
                    .get(position)
                    .and_then(|f| f.trim().parse::<usize>().ok())
                    .ok_or_else(|| {
                        BedtoolsBackend::failure(format!("unexpected output line: {line}"))
                    })
            };
            Ok((index(3)?, index(7)?))
        })
        .collect()
}

impl OverlapBackend for BedtoolsBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn overlaps(
        &self,
        chrom: &str,
        a: &[Interval],
        b: &[Interval],
    ) -> Result<Vec<(usize, usize)>, IntersectError> {
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }

        let a_file = Self::write_group(a)?;
        let b_file = Self::write_group(b)?;

        debug!(
            "Running {} intersect on {chrom} ({} x {} intervals)",
            self.program.display(),
            a.len(),
            b.len()
        );

        let output = Command::new(&self.program)
            .arg("intersect")
            .arg("-a")
            .arg(a_file.path())
            .arg("-b")
            .arg(b_file.path())
            .arg("-wa")
            .arg("-wb")
            .output()?;

        if !output.status.success() {
            return Err(Self::failure(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let pairs = parse_pairs(&String::from_utf8_lossy(&output.stdout))?;
        match pairs.iter().any(|&(i, j)| i >= a.len() || j >= b.len()) {
            true => Err(Self::failure(format!("row index out of range on {chrom}"))),
            false => Ok(pairs),
        }
    }
}
