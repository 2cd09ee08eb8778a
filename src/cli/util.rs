use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ScanError;
use crate::reader::{self, RecordReader};

/// Opens the record stream for a command, honoring a length-cap override.
///
/// # Errors
/// Returns an error if the file cannot be opened.
pub fn open_records(
    file: &Path,
    max_record_len: Option<u32>,
) -> Result<RecordReader<BufReader<File>>, ScanError> {
    match max_record_len {
        Some(cap) => {
            let f = File::open(file)?;
            Ok(RecordReader::with_max_record_len(BufReader::new(f), cap))
        }
        None => reader::open_file(file),
    }
}
