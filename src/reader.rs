//! Pull-based reader for files of back-to-back length-prefixed records.
//!
//! Each record starts with a 4-byte little-endian length that counts itself,
//! followed by the record body; a serialized BSON document is exactly that
//! shape, so the stream is handed to the codec with the prefix still in band.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::iter::FusedIterator;
use std::path::Path;

use bson::Document;

use crate::errors::ScanError;

/// Upper bound on a single record allocation unless overridden.
pub const DEFAULT_MAX_RECORD_LEN: u32 = 16_000_000;

/// Smallest self-consistent record: the length prefix plus the trailing NUL.
const MIN_RECORD_LEN: u32 = 5;

/// Iterator over the documents of a record stream. One record buffer is
/// reused across records; any error ends the stream and the iterator stays
/// exhausted afterwards.
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    inner: R,
    max_record_len: u32,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self::with_max_record_len(inner, DEFAULT_MAX_RECORD_LEN)
    }

    #[must_use]
    pub fn with_max_record_len(inner: R, max_record_len: u32) -> Self {
        Self { inner, max_record_len, buf: Vec::with_capacity(4096), done: false }
    }

    fn read_record(&mut self) -> Option<Result<Document, ScanError>> {
        let mut len_buf = [0u8; 4];
        match read_full(&mut self.inner, &mut len_buf) {
            Ok(4) => {}
            // Anything shorter at a record boundary is a clean end of stream.
            Ok(_) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        }
        let len = u32::from_le_bytes(len_buf);
        if len < MIN_RECORD_LEN || len > self.max_record_len {
            self.done = true;
            return Some(Err(ScanError::RecordLength { len, max: self.max_record_len }));
        }
        let len = len as usize;
        self.buf.clear();
        self.buf.extend_from_slice(&len_buf);
        self.buf.resize(len, 0);
        match read_full(&mut self.inner, &mut self.buf[4..]) {
            Ok(n) if n == len - 4 => {}
            Ok(n) => {
                self.done = true;
                return Some(Err(ScanError::TruncatedRecord { expected: len - 4, got: n }));
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        }
        match Document::from_reader(&mut &self.buf[..]) {
            Ok(doc) => Some(Ok(doc)),
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Document, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.read_record()
    }
}

impl<R: Read> FusedIterator for RecordReader<R> {}

/// Opens a record stream over a file with the default length cap.
///
/// # Errors
/// Returns an error if the file cannot be opened.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<RecordReader<BufReader<File>>, ScanError> {
    let file = File::open(path)?;
    Ok(RecordReader::new(BufReader::new(file)))
}

/// Reads until `buf` is full or the source is exhausted, retrying on
/// interruption. Returns how many bytes were actually read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
