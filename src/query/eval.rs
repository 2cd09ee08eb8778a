use bson::{Bson, Document};
use std::cmp::Ordering;

use crate::value::{compare, deep_eq};

use super::types::{Predicate, Query};

impl Query {
    /// Evaluates the query against one document: every field's predicates
    /// must hold, and the first failure ends evaluation. A field with no
    /// predicates is vacuously true.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        if self.debug {
            self.matches_with_trace(doc, |field, pred, outcome| {
                log::debug!("field={field} op={} -> {outcome}", pred.name());
            })
        } else {
            self.matches_with_trace(doc, |_, _, _| {})
        }
    }

    /// Same evaluation as [`matches`](Self::matches), invoking `trace` for
    /// every predicate actually evaluated, in evaluation order.
    pub fn matches_with_trace<F>(&self, doc: &Document, mut trace: F) -> bool
    where
        F: FnMut(&str, &Predicate, bool),
    {
        for fp in &self.fields {
            let value = doc.get(&fp.field);
            for pred in &fp.predicates {
                let ok = eval_predicate(pred, value);
                trace(&fp.field, pred, ok);
                if !ok {
                    return false;
                }
            }
        }
        true
    }

    /// Streams `documents` through the query, handing each accepted document
    /// to `on_match` in input order.
    pub fn find<I, F>(&self, documents: I, mut on_match: F)
    where
        I: IntoIterator<Item = Document>,
        F: FnMut(Document),
    {
        for doc in documents {
            if self.matches(&doc) {
                on_match(doc);
            }
        }
    }
}

/// A missing field arrives as `None`; each operator decides what that means.
#[allow(clippy::cast_possible_wrap)]
fn eval_predicate(pred: &Predicate, value: Option<&Bson>) -> bool {
    match pred {
        Predicate::Eq(target) => broadcast(value, |v| deep_eq(v, target)),
        Predicate::Gt(target) => {
            broadcast(value, |v| compare(v, target) == Some(Ordering::Greater))
        }
        Predicate::Gte(target) => {
            broadcast(value, |v| {
                matches!(compare(v, target), Some(Ordering::Greater | Ordering::Equal))
            })
        }
        Predicate::Lt(target) => broadcast(value, |v| compare(v, target) == Some(Ordering::Less)),
        Predicate::Lte(target) => {
            broadcast(value, |v| {
                matches!(compare(v, target), Some(Ordering::Less | Ordering::Equal))
            })
        }
        Predicate::In(set) => broadcast(value, |v| set.iter().any(|x| deep_eq(v, x))),
        Predicate::Nin(set) => !broadcast(value, |v| set.iter().any(|x| deep_eq(v, x))),
        Predicate::All(targets) => match value {
            Some(Bson::Array(items)) => {
                targets.iter().all(|t| items.iter().any(|v| deep_eq(v, t)))
            }
            Some(v) => targets.iter().all(|t| deep_eq(v, t)),
            None => targets.is_empty(),
        },
        Predicate::Size(n) => {
            matches!(value, Some(Bson::Array(items)) if items.len() as i64 == *n)
        }
        Predicate::Regex(re) => matches!(value, Some(Bson::String(s)) if re.is_match(s)),
    }
}

/// An array field satisfies a predicate when any element does; a missing
/// field satisfies none.
fn broadcast<P>(value: Option<&Bson>, pred: P) -> bool
where
    P: Fn(&Bson) -> bool,
{
    match value {
        Some(Bson::Array(items)) => items.iter().any(pred),
        Some(v) => pred(v),
        None => false,
    }
}
