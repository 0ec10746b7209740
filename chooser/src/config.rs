//! Select configuration.

use serde::{Deserialize, Deserializer};

use crate::filter::FilterOption;
use crate::value::SelectValue;

/// Selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// One value or none.
    #[default]
    Single,
    /// Any number of values.
    Multiple,
    /// Like `Multiple`, and typed text can become new options.
    Tags,
}

impl SelectMode {
    /// True for `Multiple` and `Tags`.
    pub fn is_multiple(self) -> bool {
        matches!(self, SelectMode::Multiple | SelectMode::Tags)
    }
}

/// Search box behavior.
///
/// Deserializes from `false`, `true`, or
/// `{ "retainInputValueWhileSelect": bool }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowSearch {
    /// No search box.
    #[default]
    Off,
    /// Search box, cleared after each pick in multiple mode.
    On,
    /// Search box that keeps its text after each pick.
    Retain,
}

impl ShowSearch {
    pub fn is_enabled(self) -> bool {
        !matches!(self, ShowSearch::Off)
    }

    pub fn retains_input(self) -> bool {
        matches!(self, ShowSearch::Retain)
    }
}

impl From<bool> for ShowSearch {
    fn from(enabled: bool) -> Self {
        if enabled { ShowSearch::On } else { ShowSearch::Off }
    }
}

impl<'de> Deserialize<'de> for ShowSearch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Options {
            #[serde(default)]
            retain_input_value_while_select: bool,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Options(Options),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => flag.into(),
            Raw::Options(o) if o.retain_input_value_while_select => ShowSearch::Retain,
            Raw::Options(_) => ShowSearch::On,
        })
    }
}

/// Per-instance configuration.
///
/// Supplying [`value`](Self::value) makes the instance controlled: the host
/// owns the selection and pushes it with `Select::sync_value`. This choice is
/// fixed when the select is constructed.
#[derive(Debug, Clone, Default)]
pub struct SelectConfig {
    /// Selection mode.
    pub mode: SelectMode,
    /// Controlled value. `None` means the select owns its value.
    pub value: Option<SelectValue>,
    /// Initial value for an uncontrolled select.
    pub default_value: Option<SelectValue>,
    /// Decorate emitted values with their labels.
    pub label_in_value: bool,
    /// Search box behavior.
    pub show_search: ShowSearch,
    /// How options are filtered by the search text.
    pub filter_option: FilterOption,
    /// Controlled search text. `None` means the select owns it.
    pub input_value: Option<String>,
    /// Ignore all user input.
    pub disabled: bool,
    /// Text shown when nothing is selected.
    pub placeholder: Option<String>,
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection mode.
    pub fn mode(mut self, mode: SelectMode) -> Self {
        self.mode = mode;
        self
    }

    /// Make the select controlled with an initial value.
    pub fn value(mut self, value: impl Into<SelectValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the initial value of an uncontrolled select.
    pub fn default_value(mut self, value: impl Into<SelectValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Emit `LabeledValue`s instead of raw values.
    pub fn label_in_value(mut self) -> Self {
        self.label_in_value = true;
        self
    }

    /// Set search box behavior.
    pub fn show_search(mut self, show: impl Into<ShowSearch>) -> Self {
        self.show_search = show.into();
        self
    }

    /// Set the option filter.
    pub fn filter_option(mut self, filter: impl Into<FilterOption>) -> Self {
        self.filter_option = filter.into();
        self
    }

    /// Make the search text controlled.
    pub fn input_value(mut self, text: impl Into<String>) -> Self {
        self.input_value = Some(text.into());
        self
    }

    /// Disable the select.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set placeholder text.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

/// The serializable subset of [`SelectConfig`], for hosts that load widget
/// settings from a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectSettings {
    pub mode: SelectMode,
    pub label_in_value: bool,
    pub show_search: ShowSearch,
    pub filter_option: Option<bool>,
    pub disabled: bool,
    pub placeholder: Option<String>,
    pub default_value: Option<SelectValue>,
}

impl From<SelectSettings> for SelectConfig {
    fn from(s: SelectSettings) -> Self {
        Self {
            mode: s.mode,
            value: None,
            default_value: s.default_value,
            label_in_value: s.label_in_value,
            show_search: s.show_search,
            filter_option: s.filter_option.map(FilterOption::from).unwrap_or_default(),
            input_value: None,
            disabled: s.disabled,
            placeholder: s.placeholder,
        }
    }
}
