use std::path::PathBuf;

// Programmatic command surface; the binary maps parsed arguments onto these.
pub enum Command {
    /// Stream matching documents as NDJSON to stdout.
    Find {
        file: PathBuf,
        filter_json: String,
        limit: Option<u64>,
        max_record_len: Option<u32>,
        debug: bool,
    },
    /// Print the number of matching documents.
    Count {
        file: PathBuf,
        filter_json: String,
        max_record_len: Option<u32>,
        debug: bool,
    },
}
