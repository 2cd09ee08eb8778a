use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::ScanError;
use crate::query::parse_query_json;

use super::command::Command;
use super::util::open_records;

/// Executes one programmatic command against a record file.
///
/// # Errors
/// Returns compile errors before any output and stream errors after the
/// output produced so far; emitted lines stand either way.
pub fn run(cmd: Command) -> Result<(), ScanError> {
    match cmd {
        Command::Find { file, filter_json, limit, max_record_len, debug } => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            run_find(&file, &filter_json, limit, max_record_len, debug, &mut out)
        }
        Command::Count { file, filter_json, max_record_len, debug } => {
            let query = parse_query_json(&filter_json, debug)?;
            let records = open_records(&file, max_record_len)?;
            let mut count = 0u64;
            for record in records {
                match record {
                    Ok(doc) => {
                        if query.matches(&doc) {
                            count += 1;
                        }
                    }
                    Err(e) => {
                        // Report what was counted before the stream failed.
                        println!("{count}");
                        return Err(e);
                    }
                }
            }
            println!("{count}");
            Ok(())
        }
    }
}

/// Streams matching documents to `out` as NDJSON, stopping once `limit`
/// matches have been written.
fn run_find<W: Write>(
    file: &Path,
    filter_json: &str,
    limit: Option<u64>,
    max_record_len: Option<u32>,
    debug: bool,
    out: &mut W,
) -> Result<(), ScanError> {
    let query = parse_query_json(filter_json, debug)?;
    let records = open_records(file, max_record_len)?;
    let mut matched = 0u64;
    for record in records {
        // A limit of zero emits nothing.
        if limit.is_some_and(|n| matched >= n) {
            break;
        }
        let doc = match record {
            Ok(doc) => doc,
            Err(e) => {
                out.flush()?;
                return Err(e);
            }
        };
        if !query.matches(&doc) {
            continue;
        }
        let line = serde_json::to_string(&doc)?;
        writeln!(out, "{line}")?;
        matched += 1;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_file(dir: &tempfile::TempDir, docs: &[bson::Document]) -> std::path::PathBuf {
        let path = dir.path().join("records.bson");
        let mut buf = Vec::new();
        for d in docs {
            d.to_writer(&mut buf).unwrap();
        }
        std::fs::write(&path, buf).unwrap();
        path
    }

    #[test]
    fn find_limit_zero_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = record_file(&dir, &[bson::doc! {"n": 1}, bson::doc! {"n": 2}]);

        let mut out = Vec::new();
        run_find(&path, "{}", Some(0), None, false, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn find_limit_caps_emitted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            record_file(&dir, &[bson::doc! {"n": 1}, bson::doc! {"n": 2}, bson::doc! {"n": 3}]);

        let mut out = Vec::new();
        run_find(&path, "{}", Some(2), None, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);

        let mut out = Vec::new();
        run_find(&path, "{}", None, None, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }
}
