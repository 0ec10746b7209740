//! Notifications a select emits, and the handlers that receive them.

use std::fmt;
use std::sync::Arc;

use crate::input::ScrollMetrics;
use crate::option::OptionInfo;
use crate::value::ChangePayload;

/// Why the search text changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChangeReason {
    /// The user typed, or the select was cleared.
    Manual,
    /// An option was checked in multiple mode.
    OptionChecked,
    /// The option list closed, or the select blurred while closed.
    ListClosed,
}

impl InputChangeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InputChangeReason::Manual => "manual",
            InputChangeReason::OptionChecked => "optionChecked",
            InputChangeReason::ListClosed => "optionListHide",
        }
    }

    /// Reasons that produce a search notification.
    pub fn triggers_search(self) -> bool {
        matches!(self, InputChangeReason::Manual | InputChangeReason::ListClosed)
    }
}

impl fmt::Display for InputChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification produced by a select operation.
///
/// Operations collect these while holding the state lock and dispatch them
/// once it is released, so handlers are free to read the select back.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    /// The committed selection changed. `options` lines up with the values.
    Change {
        value: ChangePayload,
        options: Vec<Option<OptionInfo>>,
    },
    /// A value was removed in multiple mode.
    Deselect {
        value: ChangePayload,
        option: Option<OptionInfo>,
    },
    /// The search text settled.
    Search {
        text: String,
        reason: InputChangeReason,
    },
    /// The search text changed for any reason.
    InputValueChange {
        text: String,
        reason: InputChangeReason,
    },
    /// The option list opened or closed.
    VisibleChange(bool),
    Focus,
    Blur,
    /// The selection was cleared; carries whether the list was open.
    Clear { visible: bool },
    /// The option popup scrolled.
    PopupScroll(ScrollMetrics),
}

type ChangeFn = Arc<dyn Fn(&ChangePayload, &[Option<OptionInfo>]) + Send + Sync>;
type DeselectFn = Arc<dyn Fn(&ChangePayload, Option<&OptionInfo>) + Send + Sync>;
type TextFn = Arc<dyn Fn(&str, InputChangeReason) + Send + Sync>;
type BoolFn = Arc<dyn Fn(bool) + Send + Sync>;
type UnitFn = Arc<dyn Fn() + Send + Sync>;
type ScrollFn = Arc<dyn Fn(ScrollMetrics) + Send + Sync>;
type EventFn = Arc<dyn Fn(&SelectEvent) + Send + Sync>;

/// Optional callbacks for each notification.
///
/// # Example
///
/// ```ignore
/// let handlers = SelectHandlers::new()
///     .on_change(|value, _| log::info!("picked {:?}", value))
///     .on_search(|text, reason| log::info!("search {} ({})", text, reason));
/// ```
#[derive(Clone, Default)]
pub struct SelectHandlers {
    on_change: Option<ChangeFn>,
    on_deselect: Option<DeselectFn>,
    on_search: Option<TextFn>,
    on_input_value_change: Option<TextFn>,
    on_visible_change: Option<BoolFn>,
    on_focus: Option<UnitFn>,
    on_blur: Option<UnitFn>,
    on_clear: Option<BoolFn>,
    on_popup_scroll: Option<ScrollFn>,
    on_event: Option<EventFn>,
}

impl SelectHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&ChangePayload, &[Option<OptionInfo>]) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn on_deselect<F>(mut self, f: F) -> Self
    where
        F: Fn(&ChangePayload, Option<&OptionInfo>) + Send + Sync + 'static,
    {
        self.on_deselect = Some(Arc::new(f));
        self
    }

    pub fn on_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, InputChangeReason) + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(f));
        self
    }

    pub fn on_input_value_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, InputChangeReason) + Send + Sync + 'static,
    {
        self.on_input_value_change = Some(Arc::new(f));
        self
    }

    pub fn on_visible_change<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_visible_change = Some(Arc::new(f));
        self
    }

    pub fn on_focus<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_focus = Some(Arc::new(f));
        self
    }

    pub fn on_blur<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_blur = Some(Arc::new(f));
        self
    }

    pub fn on_clear<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_clear = Some(Arc::new(f));
        self
    }

    pub fn on_popup_scroll<F>(mut self, f: F) -> Self
    where
        F: Fn(ScrollMetrics) + Send + Sync + 'static,
    {
        self.on_popup_scroll = Some(Arc::new(f));
        self
    }

    /// Receive every event, after the specific handler runs.
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&SelectEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(f));
        self
    }

    /// Route one event to its handler.
    pub fn dispatch(&self, event: &SelectEvent) {
        match event {
            SelectEvent::Change { value, options } => {
                if let Some(f) = &self.on_change {
                    f(value, options);
                }
            }
            SelectEvent::Deselect { value, option } => {
                if let Some(f) = &self.on_deselect {
                    f(value, option.as_ref());
                }
            }
            SelectEvent::Search { text, reason } => {
                if let Some(f) = &self.on_search {
                    f(text, *reason);
                }
            }
            SelectEvent::InputValueChange { text, reason } => {
                if let Some(f) = &self.on_input_value_change {
                    f(text, *reason);
                }
            }
            SelectEvent::VisibleChange(visible) => {
                if let Some(f) = &self.on_visible_change {
                    f(*visible);
                }
            }
            SelectEvent::Focus => {
                if let Some(f) = &self.on_focus {
                    f();
                }
            }
            SelectEvent::Blur => {
                if let Some(f) = &self.on_blur {
                    f();
                }
            }
            SelectEvent::Clear { visible } => {
                if let Some(f) = &self.on_clear {
                    f(*visible);
                }
            }
            SelectEvent::PopupScroll(metrics) => {
                if let Some(f) = &self.on_popup_scroll {
                    f(*metrics);
                }
            }
        }
        if let Some(f) = &self.on_event {
            f(event);
        }
    }
}

impl fmt::Debug for SelectHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectHandlers")
            .field("on_change", &self.on_change.is_some())
            .field("on_deselect", &self.on_deselect.is_some())
            .field("on_search", &self.on_search.is_some())
            .field("on_input_value_change", &self.on_input_value_change.is_some())
            .field("on_visible_change", &self.on_visible_change.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .field("on_popup_scroll", &self.on_popup_scroll.is_some())
            .field("on_event", &self.on_event.is_some())
            .finish()
    }
}
