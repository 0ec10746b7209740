//! Headless select widget state.
//!
//! The crate holds everything a select widget needs except drawing: an
//! option index built from declared options, a value store that handles
//! controlled and uncontrolled selections, and a coordinator for the option
//! list's visibility and search text. Hosts render from [`Select`]'s state
//! and forward user input to it.

pub mod config;
pub mod deferred;
pub mod error;
pub mod events;
pub mod filter;
pub mod index;
pub mod input;
pub mod option;
pub mod select;
pub mod store;
pub mod value;
pub mod visibility;

pub use select::{Select, SelectId};

pub mod prelude {
    pub use crate::config::{SelectConfig, SelectMode, SelectSettings, ShowSearch};
    pub use crate::deferred::{DeferredTask, ScrollTarget};
    pub use crate::error::SelectError;
    pub use crate::events::{InputChangeReason, SelectEvent, SelectHandlers};
    pub use crate::filter::FilterOption;
    pub use crate::index::{Direction, IndexEntry, OptionIndex};
    pub use crate::input::{EventResult, Key, KeyCombo, Modifiers, ScrollMetrics};
    pub use crate::option::{OptionDecl, OptionInfo, OptionKey, OptionOrigin, SelectOption, options};
    pub use crate::select::{Select, SelectId};
    pub use crate::store::{DisplayText, ValueOwnership};
    pub use crate::value::{ChangePayload, LabeledValue, SelectValue, Value};
    pub use crate::visibility::Visibility;
}
