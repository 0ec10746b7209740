//! Select error types.

use thiserror::Error;

use crate::value::Value;

/// Errors from operations a host calls directly.
///
/// Input dispatch (`click_option`, `on_key`) never returns these. It
/// degrades to `EventResult::Ignored` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// Check/uncheck called while in single mode.
    #[error("operation requires multiple or tags mode")]
    NotMultiple,

    /// The value doesn't resolve in the option index.
    #[error("value '{0}' is not a known option")]
    UnknownValue(Value),

    /// The option exists but is disabled.
    #[error("option '{0}' is disabled")]
    OptionDisabled(Value),

    /// Positional removal past the end of the selection.
    #[error("index {index} out of range for selection of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Current selection length.
        len: usize,
    },

    /// The whole widget is disabled.
    #[error("select is disabled")]
    Disabled,
}
