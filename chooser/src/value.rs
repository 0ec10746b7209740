//! Option values and the shapes a selection can take.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SelectMode;

/// A primitive option value.
///
/// Hosts usually key options by string, but numeric ids are common enough
/// that both are first-class. Deserializes untagged, so `1` and `"1"` are
/// different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Text used for filtering and as the display fallback.
    pub fn as_text(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

/// A value decorated with its resolved label (`label_in_value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub value: Value,
    pub label: String,
}

/// A selection, shaped by mode.
///
/// Single mode always holds `Single`, multiple and tags modes always hold
/// `Multiple`. [`SelectValue::normalize`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectValue<T = Value> {
    Multiple(Vec<T>),
    Single(Option<T>),
}

impl<T> Default for SelectValue<T> {
    fn default() -> Self {
        SelectValue::Single(None)
    }
}

impl<T: Clone> SelectValue<T> {
    /// Empty value for the given mode.
    pub fn empty(mode: SelectMode) -> Self {
        if mode.is_multiple() {
            SelectValue::Multiple(Vec::new())
        } else {
            SelectValue::Single(None)
        }
    }

    /// Reshape for `mode`.
    ///
    /// Scalar into multiple wraps (`a` → `[a]`, absent → `[]`). Sequence into
    /// single keeps the first element (`[]` → absent).
    pub fn normalize(self, mode: SelectMode) -> Self {
        match (self, mode.is_multiple()) {
            (SelectValue::Single(v), true) => SelectValue::Multiple(v.into_iter().collect()),
            (SelectValue::Multiple(vs), false) => SelectValue::Single(vs.into_iter().next()),
            (v, _) => v,
        }
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        match self {
            SelectValue::Single(v) => v.is_none(),
            SelectValue::Multiple(vs) => vs.is_empty(),
        }
    }

    /// First selected element, if any.
    pub fn first(&self) -> Option<&T> {
        match self {
            SelectValue::Single(v) => v.as_ref(),
            SelectValue::Multiple(vs) => vs.first(),
        }
    }

    /// Selected elements in order.
    pub fn as_slice(&self) -> &[T] {
        match self {
            SelectValue::Single(v) => v.as_slice(),
            SelectValue::Multiple(vs) => vs.as_slice(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, SelectValue::Multiple(_))
    }

    /// Map every element, keeping the shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> SelectValue<U> {
        match self {
            SelectValue::Single(v) => SelectValue::Single(v.as_ref().map(f)),
            SelectValue::Multiple(vs) => SelectValue::Multiple(vs.iter().map(&mut f).collect()),
        }
    }
}

impl<T: PartialEq> SelectValue<T> {
    pub fn contains(&self, item: &T) -> bool {
        match self {
            SelectValue::Single(v) => v.as_ref() == Some(item),
            SelectValue::Multiple(vs) => vs.contains(item),
        }
    }
}

impl From<Value> for SelectValue {
    fn from(v: Value) -> Self {
        SelectValue::Single(Some(v))
    }
}

impl From<Vec<Value>> for SelectValue {
    fn from(vs: Vec<Value>) -> Self {
        SelectValue::Multiple(vs)
    }
}

/// Value handed to `on_change` and `on_deselect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangePayload {
    Raw(SelectValue<Value>),
    Labeled(SelectValue<LabeledValue>),
}

impl ChangePayload {
    /// The raw values, whichever variant this is.
    pub fn values(&self) -> Vec<Value> {
        match self {
            ChangePayload::Raw(v) => v.as_slice().to_vec(),
            ChangePayload::Labeled(v) => v.as_slice().iter().map(|l| l.value.clone()).collect(),
        }
    }
}
