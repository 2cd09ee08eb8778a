use bson::{Document, doc};
use bsonscan::errors::ScanError;
use bsonscan::query::Query;
use bsonscan::reader::RecordReader;
use bsonscan::{ScanReport, scan_file, scan_records};

fn encode(docs: &[Document]) -> Vec<u8> {
    let mut buf = Vec::new();
    for d in docs {
        d.to_writer(&mut buf).unwrap();
    }
    buf
}

#[test]
fn scan_records_reports_counts() {
    let buf = encode(&[
        doc! {"name": "alice", "age": 30},
        doc! {"name": "bob", "age": 18},
        doc! {"name": "carol", "age": 21},
    ]);
    let query = Query::compile(&doc! {"age": {"$gte": 21}}, false).unwrap();
    let mut seen: Vec<String> = vec![];
    let report = scan_records(RecordReader::new(&buf[..]), &query, |d| {
        seen.push(d.get_str("name").unwrap().to_string());
    })
    .unwrap();
    assert_eq!(report, ScanReport { scanned: 3, matched: 2 });
    assert_eq!(seen, vec!["alice", "carol"]);
}

#[test]
fn scan_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.bson");
    let buf = encode(&[
        doc! {"name": "alice", "age": 30},
        doc! {"name": "bob", "age": 18},
    ]);
    std::fs::write(&path, buf).unwrap();

    let query = Query::compile(&doc! {"age": {"$gt": 21}}, false).unwrap();
    let mut names: Vec<String> = vec![];
    let report = scan_file(&path, &query, |d| {
        names.push(d.get_str("name").unwrap().to_string());
    })
    .unwrap();
    assert_eq!(report, ScanReport { scanned: 2, matched: 1 });
    assert_eq!(names, vec!["alice"]);
}

#[test]
fn matches_before_a_stream_failure_stand() {
    // Two good records, then a record whose body never arrives
    let mut buf = encode(&[doc! {"n": 1}, doc! {"n": 2}]);
    buf.extend_from_slice(&64u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);

    let query = Query::compile(&doc! {}, false).unwrap();
    let mut seen = 0u32;
    let err = scan_records(RecordReader::new(&buf[..]), &query, |_| seen += 1).unwrap_err();
    assert!(matches!(err, ScanError::TruncatedRecord { expected: 60, got: 8 }));
    assert_eq!(seen, 2);
}

#[test]
fn scan_file_missing_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let query = Query::compile(&doc! {}, false).unwrap();
    let err = scan_file(dir.path().join("absent.bson"), &query, |_| {}).unwrap_err();
    assert!(matches!(err, ScanError::Io(_)));
}
