use bson::{Bson, Document};
use regex::Regex;

use crate::errors::ScanError;

use super::types::{FieldPredicates, Predicate, Query};

impl Query {
    /// Compiles a filter document into per-field predicate lists. A top-level
    /// value that is itself a document is an operator bag; anything else is
    /// an exact-match target.
    ///
    /// # Errors
    /// Returns an error for unknown operator keys and for ill-typed operands.
    pub fn compile(filter: &Document, debug: bool) -> Result<Self, ScanError> {
        let mut fields = Vec::with_capacity(filter.len());
        for (field, value) in filter {
            let predicates = match value {
                Bson::Document(ops) => {
                    let mut predicates = Vec::with_capacity(ops.len());
                    for (op, operand) in ops {
                        predicates.push(compile_operator(op, operand)?);
                    }
                    predicates
                }
                target => vec![Predicate::Eq(target.clone())],
            };
            fields.push(FieldPredicates { field: field.clone(), predicates });
        }
        log::debug!("compiled filter: {} field(s)", fields.len());
        Ok(Self { fields, debug })
    }
}

/// Parses a JSON filter and compiles it.
///
/// # Errors
/// Returns an error if the text is not a JSON object or the filter fails to
/// compile.
pub fn parse_query_json(json: &str, debug: bool) -> Result<Query, ScanError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(ScanError::InvalidFilter("filter must be a JSON object".into()));
    }
    let filter = bson::to_document(&value)?;
    Query::compile(&filter, debug)
}

fn compile_operator(op: &str, operand: &Bson) -> Result<Predicate, ScanError> {
    match op {
        "$gt" => Ok(Predicate::Gt(operand.clone())),
        "$gte" => Ok(Predicate::Gte(operand.clone())),
        "$lt" => Ok(Predicate::Lt(operand.clone())),
        "$lte" => Ok(Predicate::Lte(operand.clone())),
        "$in" => Ok(Predicate::In(array_operand("$in", operand)?)),
        "$nin" => Ok(Predicate::Nin(array_operand("$nin", operand)?)),
        "$all" => Ok(Predicate::All(array_operand("$all", operand)?)),
        "$size" => Ok(Predicate::Size(size_operand(operand)?)),
        "regex" => match operand {
            Bson::String(pattern) => Ok(Predicate::Regex(Regex::new(pattern)?)),
            _ => Err(ScanError::OperandType { op: "regex", expected: "string" }),
        },
        other => Err(ScanError::UnsupportedOperator(other.to_string())),
    }
}

fn array_operand(op: &'static str, operand: &Bson) -> Result<Vec<Bson>, ScanError> {
    match operand {
        Bson::Array(values) => Ok(values.clone()),
        _ => Err(ScanError::OperandType { op, expected: "array" }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn size_operand(operand: &Bson) -> Result<i64, ScanError> {
    let n = match *operand {
        Bson::Int32(i) => i64::from(i),
        Bson::Int64(i) => i,
        Bson::Double(d) if d.is_finite() && d.fract() == 0.0 => d as i64,
        _ => return Err(ScanError::OperandType { op: "$size", expected: "non-negative integer" }),
    };
    if n < 0 {
        return Err(ScanError::OperandType { op: "$size", expected: "non-negative integer" });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn operator_bags_and_exact_targets_split_per_field() {
        let q = Query::compile(&doc! {"a": {"$gt": 1, "$lt": 9}, "b": "x"}, false).unwrap();
        assert_eq!(q.fields.len(), 2);
        assert_eq!(q.fields[0].predicates.len(), 2);
        assert_eq!(q.fields[0].predicates[0].name(), "$gt");
        assert_eq!(q.fields[1].predicates[0].name(), "$eq");
    }

    #[test]
    fn size_operand_typing() {
        assert!(Query::compile(&doc! {"a": {"$size": 3}}, false).is_ok());
        assert!(Query::compile(&doc! {"a": {"$size": bson::Bson::Int64(3)}}, false).is_ok());
        assert!(Query::compile(&doc! {"a": {"$size": 3.0}}, false).is_ok());
        assert!(Query::compile(&doc! {"a": {"$size": 3.5}}, false).is_err());
        assert!(Query::compile(&doc! {"a": {"$size": -2}}, false).is_err());
        assert!(Query::compile(&doc! {"a": {"$size": f64::NAN}}, false).is_err());
    }
}
