//! Document query filters
//!
//! A `CompoundFilter` maps field names to per-field predicates, ANDed
//! together. The empty filter matches every document.

use serde_json::{Map, Value};

use crate::value::{Document, TypedValue, ID_FIELD};

/// Equality operator
pub const OP_EQ: &str = "$et";
/// Inclusive lower bound operator
pub const OP_GTE: &str = "$gte";
/// Inclusive upper bound operator
pub const OP_LTE: &str = "$lte";

/// Predicate on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPredicate {
    Eq(TypedValue),
    Gte(TypedValue),
    Lte(TypedValue),
    /// Both bounds inclusive
    Range { lower: TypedValue, upper: TypedValue },
}

impl FieldPredicate {
    /// Combines optional bounds; `None` when neither is present
    pub fn from_bounds(lower: Option<TypedValue>, upper: Option<TypedValue>) -> Option<Self> {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Some(FieldPredicate::Range { lower, upper }),
            (Some(lower), None) => Some(FieldPredicate::Gte(lower)),
            (None, Some(upper)) => Some(FieldPredicate::Lte(upper)),
            (None, None) => None,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, FieldPredicate::Eq(_))
    }

    /// Inclusive lower bound, if any. Equality bounds both ways.
    pub fn lower(&self) -> Option<&TypedValue> {
        match self {
            FieldPredicate::Eq(v) | FieldPredicate::Gte(v) => Some(v),
            FieldPredicate::Range { lower, .. } => Some(lower),
            FieldPredicate::Lte(_) => None,
        }
    }

    /// Inclusive upper bound, if any
    pub fn upper(&self) -> Option<&TypedValue> {
        match self {
            FieldPredicate::Eq(v) | FieldPredicate::Lte(v) => Some(v),
            FieldPredicate::Range { upper, .. } => Some(upper),
            FieldPredicate::Gte(_) => None,
        }
    }

    /// Operator object, e.g. `{"$gte": 1.5, "$lte": 9.5}`
    pub fn to_json(&self) -> Value {
        let mut ops = Map::new();
        match self {
            FieldPredicate::Eq(v) => {
                ops.insert(OP_EQ.into(), v.to_json());
            }
            FieldPredicate::Gte(v) => {
                ops.insert(OP_GTE.into(), v.to_json());
            }
            FieldPredicate::Lte(v) => {
                ops.insert(OP_LTE.into(), v.to_json());
            }
            FieldPredicate::Range { lower, upper } => {
                ops.insert(OP_GTE.into(), lower.to_json());
                ops.insert(OP_LTE.into(), upper.to_json());
            }
        }
        Value::Object(ops)
    }
}

/// Ordered field -> predicate mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundFilter {
    terms: Vec<(String, FieldPredicate)>,
}

impl CompoundFilter {
    /// The match-all filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Single equality term
    pub fn eq(field: impl Into<String>, value: TypedValue) -> Self {
        let mut filter = Self::new();
        filter.insert(field, FieldPredicate::Eq(value));
        filter
    }

    /// Filter selecting exactly `doc`: by `_id` when present, otherwise by
    /// equality on every field.
    pub fn identity(doc: &Document) -> Self {
        if let Some(id) = doc.get(ID_FIELD) {
            return Self::eq(ID_FIELD, id.clone());
        }
        let mut filter = Self::new();
        for (name, value) in doc.iter() {
            filter.insert(name, FieldPredicate::Eq(value.clone()));
        }
        filter
    }

    /// Sets the predicate for `field`, replacing any earlier one in place
    pub fn insert(&mut self, field: impl Into<String>, predicate: FieldPredicate) {
        let field = field.into();
        match self.terms.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = predicate,
            None => self.terms.push((field, predicate)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldPredicate> {
        self.terms
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether this is the match-all filter
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPredicate)> {
        self.terms.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// `{field: {op: value, ...}, ...}`
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .terms
            .iter()
            .map(|(name, p)| (name.clone(), p.to_json()))
            .collect();
        Value::Object(map)
    }
}
