//! In-process filter evaluation
//!
//! Evaluates a `CompoundFilter` against a document:
//! - AND across fields
//! - a missing or null field never matches
//! - integers, doubles and decimal text compare numerically
//! - text and binary compare bytewise
//! - dates and timestamps compare by instant
//! - values from different families never match

use std::cmp::Ordering;

use crate::value::{Document, TypedValue};

use super::ast::{CompoundFilter, FieldPredicate};

/// Evaluates compound filters against documents
pub struct FilterMatcher;

impl FilterMatcher {
    /// Checks if a document matches every term of the filter
    pub fn matches(document: &Document, filter: &CompoundFilter) -> bool {
        filter
            .iter()
            .all(|(field, predicate)| Self::matches_predicate(document, field, predicate))
    }

    fn matches_predicate(document: &Document, field: &str, predicate: &FieldPredicate) -> bool {
        let actual = match document.get(field) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };

        match predicate {
            FieldPredicate::Eq(expected) => compare(actual, expected) == Some(Ordering::Equal),
            FieldPredicate::Gte(bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FieldPredicate::Lte(bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FieldPredicate::Range { lower, upper } => {
                matches!(
                    compare(actual, lower),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    compare(actual, upper),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
        }
    }
}

/// Comparable projection of a value
enum Key<'a> {
    Int(i128),
    Real(f64),
    Bytes(&'a [u8]),
    Instant(i128),
    Bool(bool),
}

fn key(value: &TypedValue) -> Option<Key<'_>> {
    match value {
        TypedValue::SignedInt64(v) => Some(Key::Int(i128::from(*v))),
        TypedValue::UnsignedInt64(v) => Some(Key::Int(i128::from(*v))),
        TypedValue::Double(v) => Some(Key::Real(*v)),
        TypedValue::DecimalText(text) => match text.parse::<i128>() {
            Ok(v) => Some(Key::Int(v)),
            Err(_) => text.parse::<f64>().ok().map(Key::Real),
        },
        TypedValue::Binary(bytes) | TypedValue::Utf8(bytes) => Some(Key::Bytes(bytes)),
        TypedValue::DateEpochMillis(ms) => Some(Key::Instant(i128::from(*ms) * 1000)),
        TypedValue::Timestamp(ts) => Some(Key::Instant(
            i128::from(ts.seconds) * 1_000_000 + i128::from(ts.micros),
        )),
        TypedValue::Bool(b) => Some(Key::Bool(*b)),
        TypedValue::Null | TypedValue::Object(_) => None,
    }
}

/// Orders two values of the same family; `None` across families
fn compare(a: &TypedValue, b: &TypedValue) -> Option<Ordering> {
    match (key(a)?, key(b)?) {
        (Key::Int(x), Key::Int(y)) => Some(x.cmp(&y)),
        (Key::Int(x), Key::Real(y)) => (x as f64).partial_cmp(&y),
        (Key::Real(x), Key::Int(y)) => x.partial_cmp(&(y as f64)),
        (Key::Real(x), Key::Real(y)) => x.partial_cmp(&y),
        (Key::Bytes(x), Key::Bytes(y)) => Some(x.cmp(y)),
        (Key::Instant(x), Key::Instant(y)) => Some(x.cmp(&y)),
        (Key::Bool(x), Key::Bool(y)) => Some(x.cmp(&y)),
        _ => None,
    }
}
