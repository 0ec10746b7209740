//! Value store: the committed selection and who owns it.

use std::collections::HashMap;

use crate::config::{SelectConfig, SelectMode};
use crate::error::SelectError;
use crate::index::OptionIndex;
use crate::option::{OptionInfo, OptionOrigin};
use crate::value::{ChangePayload, LabeledValue, SelectValue, Value};

/// Who owns a piece of select state.
///
/// Picked once when the select is constructed. `External` state is pushed
/// by the host every render and internal writes to it are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueOwnership {
    External,
    #[default]
    Internal,
}

/// Display text for one selected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub value: Value,
    /// Resolved label, or the raw value's text when unresolvable.
    pub text: String,
    pub disabled: bool,
}

/// Holds the canonical selection.
#[derive(Debug, Clone)]
pub struct ValueStore {
    ownership: ValueOwnership,
    mode: SelectMode,
    internal: SelectValue,
    external: SelectValue,
    /// Metadata for every value that has resolved at least once, so values
    /// that drop out of the index still render with their label.
    resolved: HashMap<Value, OptionInfo>,
}

impl ValueStore {
    pub fn new(config: &SelectConfig) -> Self {
        let mode = config.mode;
        let ownership = if config.value.is_some() {
            ValueOwnership::External
        } else {
            ValueOwnership::Internal
        };
        let normalize = |v: &Option<SelectValue>| {
            v.clone()
                .map(|v| v.normalize(mode))
                .unwrap_or_else(|| SelectValue::empty(mode))
        };
        Self {
            ownership,
            mode,
            internal: normalize(&config.default_value),
            external: normalize(&config.value),
            resolved: HashMap::new(),
        }
    }

    pub fn ownership(&self) -> ValueOwnership {
        self.ownership
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// The selection the widget should show right now.
    pub fn current(&self) -> &SelectValue {
        match self.ownership {
            ValueOwnership::External => &self.external,
            ValueOwnership::Internal => &self.internal,
        }
    }

    /// Accept the host's controlled value. Returns true if it changed.
    ///
    /// Ignored for internally owned stores.
    pub fn sync_external(&mut self, value: SelectValue) -> bool {
        if self.ownership != ValueOwnership::External {
            return false;
        }
        let value = value.normalize(self.mode);
        if self.external == value {
            return false;
        }
        self.external = value;
        true
    }

    /// Replace the internal value with `next`, reshaped for the mode.
    ///
    /// Returns the normalized value the change notification should carry.
    /// Controlled stores don't write; the host decides whether to push the
    /// value back.
    pub fn commit(&mut self, next: SelectValue) -> SelectValue {
        let next = next.normalize(self.mode);
        if self.ownership == ValueOwnership::Internal {
            self.internal = next.clone();
        }
        next
    }

    /// Switch modes, reshaping the held values.
    ///
    /// Silent: callers must not emit a change notification for this.
    pub fn set_mode(&mut self, mode: SelectMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.internal = std::mem::take(&mut self.internal).normalize(mode);
        self.external = std::mem::take(&mut self.external).normalize(mode);
        true
    }

    /// Value after checking `value`, or `None` if already checked.
    pub fn checked(
        &self,
        value: &Value,
        index: &OptionIndex,
    ) -> Result<Option<SelectValue>, SelectError> {
        if !self.mode.is_multiple() {
            return Err(SelectError::NotMultiple);
        }
        let info = index
            .get(value)
            .ok_or_else(|| SelectError::UnknownValue(value.clone()))?;
        if info.is_disabled() {
            return Err(SelectError::OptionDisabled(value.clone()));
        }
        let current = self.current();
        if current.contains(value) {
            return Ok(None);
        }
        let mut values = current.as_slice().to_vec();
        values.push(value.clone());
        Ok(Some(SelectValue::Multiple(values)))
    }

    /// Value after unchecking `value`, or `None` if it wasn't checked.
    pub fn unchecked(&self, value: &Value) -> Result<Option<SelectValue>, SelectError> {
        if !self.mode.is_multiple() {
            return Err(SelectError::NotMultiple);
        }
        let current = self.current();
        if !current.contains(value) {
            return Ok(None);
        }
        let values = current
            .as_slice()
            .iter()
            .filter(|v| *v != value)
            .cloned()
            .collect();
        Ok(Some(SelectValue::Multiple(values)))
    }

    /// Value after `clear()`: selected disabled options survive in
    /// multiple mode, single mode empties.
    pub fn cleared(&self, index: &OptionIndex) -> SelectValue {
        match self.current() {
            SelectValue::Multiple(values) => SelectValue::Multiple(
                values
                    .iter()
                    .filter(|v| self.lookup(v, index).is_some_and(|info| info.is_disabled()))
                    .cloned()
                    .collect(),
            ),
            SelectValue::Single(_) => SelectValue::Single(None),
        }
    }

    /// Resolve `value`, remembering the result for later lookups.
    pub fn resolve(&mut self, value: &Value, index: &OptionIndex) -> Option<OptionInfo> {
        if let Some(info) = index.get(value) {
            self.resolved.insert(value.clone(), info.clone());
            return Some(info.clone());
        }
        self.resolved.get(value).cloned()
    }

    /// Resolve without touching the cache.
    pub fn lookup<'a>(&'a self, value: &Value, index: &'a OptionIndex) -> Option<&'a OptionInfo> {
        index.get(value).or_else(|| self.resolved.get(value))
    }

    /// Trigger text for `value`; falls back to the raw value.
    pub fn display(&self, value: &Value, index: &OptionIndex) -> DisplayText {
        match self.lookup(value, index) {
            Some(info) => DisplayText {
                value: value.clone(),
                text: info.option.label.clone(),
                disabled: info.is_disabled(),
            },
            None => DisplayText {
                value: value.clone(),
                text: value.as_text(),
                disabled: false,
            },
        }
    }

    /// Shape `value` for a callback.
    ///
    /// With `label_in_value`, each element is paired with its label; an
    /// empty value stays raw.
    pub fn payload(
        &mut self,
        value: &SelectValue,
        index: &OptionIndex,
        label_in_value: bool,
    ) -> (ChangePayload, Vec<Option<OptionInfo>>) {
        let options: Vec<Option<OptionInfo>> = value
            .as_slice()
            .iter()
            .map(|v| self.resolve(v, index))
            .collect();
        if !label_in_value || value.is_empty() {
            return (ChangePayload::Raw(value.clone()), options);
        }
        let mut labels = options.iter();
        let labeled = value.map(|v| LabeledValue {
            value: v.clone(),
            label: labels
                .next()
                .and_then(|o| o.as_ref())
                .map(|info| info.option.label.clone())
                .unwrap_or_else(|| v.as_text()),
        });
        (ChangePayload::Labeled(labeled), options)
    }

    /// True if `value` came from user input rather than a declaration.
    pub fn is_user_created(&self, value: &Value, index: &OptionIndex) -> bool {
        self.lookup(value, index)
            .is_some_and(|info| info.origin != OptionOrigin::Declared)
    }
}
