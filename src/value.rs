//! Equality and ordering over BSON values, shared by every predicate.

use bson::Bson;
use std::cmp::Ordering;

/// Numeric view of a value, coercing the integer widths to `f64`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn as_number(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(d) => Some(*d),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok(),
        _ => None,
    }
}

/// Structural equality: numbers compare by value across widths, arrays
/// element-wise in order, documents key-wise regardless of order.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn deep_eq(a: &Bson, b: &Bson) -> bool {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x == y;
    }
    match (a, b) {
        (Bson::Array(xs), Bson::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_eq(x, y))
        }
        (Bson::Document(x), Bson::Document(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| deep_eq(v, w)))
        }
        _ => a == b,
    }
}

/// Partial ordering used by the range operators. Numbers compare across
/// widths, strings lexicographically, booleans and datetimes natively;
/// anything else is incomparable.
#[must_use]
pub fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::bson;

    #[test]
    fn numbers_compare_across_widths() {
        assert!(deep_eq(&bson!(1), &bson!(1.0)));
        assert!(deep_eq(&Bson::Int64(3), &bson!(3)));
        assert!(!deep_eq(&bson!(1), &bson!("1")));
        assert_eq!(compare(&bson!(2), &Bson::Int64(10)), Some(Ordering::Less));
        assert_eq!(compare(&bson!(2.5), &bson!(2)), Some(Ordering::Greater));
    }

    #[test]
    fn strings_and_booleans_are_ordered() {
        assert_eq!(compare(&bson!("a"), &bson!("b")), Some(Ordering::Less));
        assert_eq!(compare(&bson!("b"), &bson!("b")), Some(Ordering::Equal));
        assert_eq!(compare(&bson!(false), &bson!(true)), Some(Ordering::Less));
    }

    #[test]
    fn mixed_types_are_incomparable() {
        assert_eq!(compare(&bson!("10"), &bson!(5)), None);
        assert_eq!(compare(&bson!(true), &bson!(1)), None);
        assert_eq!(compare(&Bson::Null, &bson!(0)), None);
    }

    #[test]
    fn arrays_compare_element_wise_in_order() {
        assert!(deep_eq(&bson!([1, 2]), &bson!([1.0, 2.0])));
        assert!(!deep_eq(&bson!([1, 2]), &bson!([2, 1])));
        assert!(!deep_eq(&bson!([1]), &bson!([1, 1])));
    }

    #[test]
    fn documents_compare_key_wise() {
        let a = bson!({"x": 1, "y": 2});
        let b = bson!({"y": 2, "x": 1});
        assert!(deep_eq(&a, &b));
        assert!(!deep_eq(&a, &bson!({"x": 1})));
        assert!(!deep_eq(&a, &bson!({"x": 1, "y": 3})));
    }

    #[test]
    fn nan_is_never_equal_or_ordered() {
        assert!(!deep_eq(&bson!(f64::NAN), &bson!(f64::NAN)));
        assert_eq!(compare(&bson!(f64::NAN), &bson!(1.0)), None);
    }
}
