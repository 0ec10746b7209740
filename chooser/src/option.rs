//! Declared options and groups.

use std::fmt;

use crate::value::Value;

/// A selectable entry declared by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectOption {
    /// The value stored in the selection when picked.
    pub value: Value,
    /// Display label. Also used for filtering.
    pub label: String,
    /// Disabled options can't be picked, and survive `clear()` in multiple mode.
    pub disabled: bool,
    /// Label of the enclosing group, filled in when flattened.
    pub group: Option<String>,
}

impl SelectOption {
    /// Create an option with value and label.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
            group: None,
        }
    }

    /// Option whose label is its value's text.
    pub fn plain(value: impl Into<Value>) -> Self {
        let value = value.into();
        let label = value.as_text();
        Self {
            value,
            label,
            disabled: false,
            group: None,
        }
    }

    /// Mark this option as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// An option or a named group of options, as the host declares them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionDecl {
    Option(SelectOption),
    Group {
        label: String,
        options: Vec<SelectOption>,
    },
}

impl OptionDecl {
    /// Declare a group.
    pub fn group(
        label: impl Into<String>,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Self {
        OptionDecl::Group {
            label: label.into(),
            options: options.into_iter().collect(),
        }
    }
}

impl From<SelectOption> for OptionDecl {
    fn from(option: SelectOption) -> Self {
        OptionDecl::Option(option)
    }
}

/// Build a flat declaration list from `(value, label)` pairs.
pub fn options<V, L>(pairs: impl IntoIterator<Item = (V, L)>) -> Vec<OptionDecl>
where
    V: Into<Value>,
    L: Into<String>,
{
    pairs
        .into_iter()
        .map(|(v, l)| OptionDecl::Option(SelectOption::new(v, l)))
        .collect()
}

/// Stable key used to scroll an entry into view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionKey(String);

impl OptionKey {
    pub(crate) fn for_value(value: &Value) -> Self {
        match value {
            Value::Int(n) => Self(format!("__opt_i{}", n)),
            Value::Text(s) => Self(format!("__opt_s{}", s)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an indexed option came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionOrigin {
    /// Declared by the host.
    Declared,
    /// A tag the user created earlier (tags mode).
    Created,
    /// The tag being typed right now (tags mode).
    Creating,
}

/// Resolved metadata for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub option: SelectOption,
    pub key: OptionKey,
    pub origin: OptionOrigin,
}

impl OptionInfo {
    pub fn label(&self) -> &str {
        &self.option.label
    }

    pub fn is_disabled(&self) -> bool {
        self.option.disabled
    }
}
