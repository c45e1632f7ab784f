use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::Encoding;
use tracing::{debug, warn};
use unify_model::RawRecord;

use crate::error::IngestError;

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

/// Resolve a WHATWG encoding label (`utf-8`, `latin1`, `windows-1252`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, IngestError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| IngestError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Read a CSV file in `encoding` into raw records.
///
/// The first non-blank row is the header. Data rows keep their 1-based
/// position; blank rows are skipped but still counted.
pub fn read_raw_records(path: &Path, encoding: &str) -> Result<Vec<RawRecord>, IngestError> {
    let encoding = encoding_for_label(encoding)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(
            path = %path.display(),
            encoding = used.name(),
            "input contained malformed sequences; replaced"
        );
    }
    let records = parse_raw_records(&text).map_err(|source| IngestError::Csv {
        path: PathBuf::from(path),
        source,
    })?;
    debug!(path = %path.display(), encoding = used.name(), rows = records.len(), "csv read");
    Ok(records)
}

/// Parse CSV text into raw records.
pub fn parse_raw_records(text: &str) -> Result<Vec<RawRecord>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();
    let mut row = 0usize;
    for record in reader.records() {
        let record = record?;
        let values: Vec<String> = record.iter().map(normalize_cell).collect();
        let blank = values.iter().all(|value| value.trim().is_empty());
        if headers.is_none() {
            if !blank {
                headers = Some(values);
            }
            continue;
        }
        row += 1;
        if blank {
            continue;
        }
        if let Some(header_row) = &headers {
            records.push(RawRecord::from_row(row, header_row, &values));
        }
    }
    Ok(records)
}
