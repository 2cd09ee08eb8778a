use bson::Bson;
use regex::Regex;

/// One compiled predicate with its typed operand.
#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(Bson),
    Gt(Bson),
    Gte(Bson),
    Lt(Bson),
    Lte(Bson),
    In(Vec<Bson>),
    Nin(Vec<Bson>),
    All(Vec<Bson>),
    Size(i64),
    Regex(Regex),
}

impl Predicate {
    /// The operator key this predicate was compiled from.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq(_) => "$eq",
            Self::Gt(_) => "$gt",
            Self::Gte(_) => "$gte",
            Self::Lt(_) => "$lt",
            Self::Lte(_) => "$lte",
            Self::In(_) => "$in",
            Self::Nin(_) => "$nin",
            Self::All(_) => "$all",
            Self::Size(_) => "$size",
            Self::Regex(_) => "regex",
        }
    }
}

/// Predicates for one field, kept in filter order.
#[derive(Debug, Clone)]
pub(crate) struct FieldPredicates {
    pub(crate) field: String,
    pub(crate) predicates: Vec<Predicate>,
}

/// A compiled filter: per-field predicate lists evaluated with AND semantics.
/// Immutable once compiled and freely shareable across threads.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) fields: Vec<FieldPredicates>,
    pub(crate) debug: bool,
}
