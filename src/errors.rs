use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("BSON decode: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("BSON encode: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Operator {op} requires {expected} operand")]
    OperandType { op: &'static str, expected: &'static str },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Record length {len} out of bounds (max {max})")]
    RecordLength { len: u32, max: u32 },

    #[error("Truncated record: expected {expected} body bytes, got {got}")]
    TruncatedRecord { expected: usize, got: usize },
}
