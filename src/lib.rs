pub mod cli;
pub mod errors;
pub mod logger;
pub mod query;
pub mod reader;
pub mod value;

use std::io::Read;
use std::path::Path;

use crate::errors::ScanError;
use crate::query::Query;
use crate::reader::RecordReader;

/// Counters for one scan pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: u64,
    pub matched: u64,
}

/// Streams the records in `path` through `query`, handing each match to
/// `on_match` as it is found.
///
/// # Errors
/// Returns an error if the file cannot be opened or the stream fails;
/// matches delivered before a failure stand.
pub fn scan_file<P, F>(path: P, query: &Query, on_match: F) -> Result<ScanReport, ScanError>
where
    P: AsRef<Path>,
    F: FnMut(bson::Document),
{
    log::info!("scan: path={}", path.as_ref().display());
    let records = reader::open_file(path)?;
    scan_records(records, query, on_match)
}

/// Drives a record stream through a compiled query.
///
/// # Errors
/// Propagates the stream's terminal error; matches delivered before a
/// failure stand.
pub fn scan_records<R, F>(
    records: RecordReader<R>,
    query: &Query,
    mut on_match: F,
) -> Result<ScanReport, ScanError>
where
    R: Read,
    F: FnMut(bson::Document),
{
    let mut report = ScanReport::default();
    for record in records {
        match record {
            Ok(doc) => {
                report.scanned += 1;
                if query.matches(&doc) {
                    report.matched += 1;
                    on_match(doc);
                }
            }
            Err(e) => {
                log::warn!("scan aborted after {} record(s): {e}", report.scanned);
                return Err(e);
            }
        }
    }
    Ok(report)
}
