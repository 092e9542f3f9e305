use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::info;

use crate::error::GenError;
use crate::record::{Record, RecordShape};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    pub lines: u64,
    /// Decompressed bytes, newlines included
    pub bytes: u64,
}

/// Stream-decompresses the gzip file at `path` and checks every line with
/// [`verify_reader`].
///
/// # Errors
/// Errors when the file cannot be opened or decompressed, or on the first line that is
/// not a valid record
pub fn verify_file(
    path: impl AsRef<Path>,
    shape: &RecordShape,
) -> Result<VerifyReport, GenError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let report = verify_reader(BufReader::new(GzDecoder::new(file)), shape)?;
    info!(
        "Verified {} records ({} bytes uncompressed) in {}",
        report.lines,
        report.bytes,
        path.display()
    );
    Ok(report)
}

/// Checks that every line of `reader` is a newline-terminated JSON object with exactly
/// the keys `id`, `value` and `timestamp`, whose fields fit `shape`.
///
/// # Errors
/// Errors with the 1-based line number of the first line that fails, with
/// [`GenError::Empty`] when there are no lines, or when reading fails
pub fn verify_reader<R: BufRead>(
    mut reader: R,
    shape: &RecordShape,
) -> Result<VerifyReport, GenError> {
    let mut report = VerifyReport::default();
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        report.lines += 1;
        report.bytes += read as u64;

        let invalid = |reason: String| GenError::InvalidRecord {
            line: report.lines,
            reason,
        };
        let body = line
            .strip_suffix('\n')
            .ok_or_else(|| invalid("missing trailing newline".to_string()))?;
        let record: Record = serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
        shape.check(&record).map_err(invalid)?;
    }

    if report.lines == 0 {
        return Err(GenError::Empty);
    }
    Ok(report)
}
