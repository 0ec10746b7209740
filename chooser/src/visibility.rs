//! Visibility and search-text coordination.
//!
//! Owns the transient state of a select: whether the option list is open,
//! the search text, the highlighted option, and the deferred task queue.
//! Every transition is idempotent; re-applying the current state emits
//! nothing.

use crate::deferred::{DeferredQueue, DeferredTask, Scheduled};
use crate::events::{InputChangeReason, SelectEvent};
use crate::index::{Direction, OptionIndex};
use crate::store::ValueOwnership;
use crate::value::{SelectValue, Value};

/// Whether the option list is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

impl Visibility {
    pub fn is_open(self) -> bool {
        self == Visibility::Open
    }
}

impl From<bool> for Visibility {
    fn from(open: bool) -> Self {
        if open { Visibility::Open } else { Visibility::Closed }
    }
}

/// Transient list and search state for one select.
#[derive(Debug)]
pub struct Coordinator {
    visibility: Visibility,
    /// Bumped on every visibility transition; deferred tasks from an older
    /// generation are dropped.
    generation: u64,
    text_owner: ValueOwnership,
    /// Search text currently shown.
    text: String,
    /// Text of the last `InputValueChange` notification.
    last_notified: String,
    last_reason: Option<InputChangeReason>,
    /// Highlighted option.
    active: Option<Value>,
    /// Set while navigating with arrow keys; hover is ignored until the
    /// mouse moves.
    keyboard_nav: bool,
    deferred: DeferredQueue,
}

impl Coordinator {
    /// `input_value` makes the search text host-owned.
    pub fn new(input_value: Option<String>) -> Self {
        let (text_owner, text) = match input_value {
            Some(text) => (ValueOwnership::External, text),
            None => (ValueOwnership::Internal, String::new()),
        };
        Self {
            visibility: Visibility::Closed,
            generation: 0,
            text_owner,
            last_notified: text.clone(),
            text,
            last_reason: None,
            active: None,
            keyboard_nav: false,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_owner(&self) -> ValueOwnership {
        self.text_owner
    }

    pub fn active(&self) -> Option<&Value> {
        self.active.as_ref()
    }

    pub fn is_keyboard_nav(&self) -> bool {
        self.keyboard_nav
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Move to `visibility`. Returns false (and emits nothing) if already there.
    ///
    /// Callers run the open/close side effects ([`on_opened`](Self::on_opened),
    /// [`on_closed`](Self::on_closed)) when this returns true.
    pub fn try_update_visible(
        &mut self,
        visibility: Visibility,
        events: &mut Vec<SelectEvent>,
    ) -> bool {
        if self.visibility == visibility {
            return false;
        }
        self.visibility = visibility;
        self.generation += 1;
        log::debug!(
            "Coordinator visibility={:?} generation={}",
            visibility,
            self.generation
        );
        events.push(SelectEvent::VisibleChange(visibility.is_open()));
        true
    }

    /// Entry actions for `Open`: highlight and schedule the scroll.
    pub fn on_opened(&mut self, current: &SelectValue, index: &OptionIndex) {
        self.keyboard_nav = false;
        self.reset_active(current, index);
        if let Some(info) = self.active.as_ref().and_then(|v| index.get(v)) {
            self.schedule(DeferredTask::ScrollIntoView(info.key.clone()));
        }
    }

    /// Entry actions for `Closed`: clear the search text.
    pub fn on_closed(&mut self, events: &mut Vec<SelectEvent>) {
        self.keyboard_nav = false;
        self.try_update_input(String::new(), InputChangeReason::ListClosed, events);
    }

    // -------------------------------------------------------------------------
    // Search text
    // -------------------------------------------------------------------------

    /// Change the search text.
    ///
    /// A no-op when `text` equals the last notified text. Otherwise emits
    /// `InputValueChange`, and `Search` once the shown text has settled on
    /// `text` for a search-triggering reason. Returns true if anything was
    /// emitted.
    pub fn try_update_input(
        &mut self,
        text: String,
        reason: InputChangeReason,
        events: &mut Vec<SelectEvent>,
    ) -> bool {
        if text == self.last_notified {
            return false;
        }
        if self.text_owner == ValueOwnership::Internal {
            self.text = text.clone();
        }
        self.last_notified = text.clone();
        self.last_reason = Some(reason);
        events.push(SelectEvent::InputValueChange {
            text: text.clone(),
            reason,
        });
        self.settle_search(events);
        true
    }

    /// Accept the host's controlled search text.
    ///
    /// Fires the pending search notification when the host catches up with
    /// the last notified text.
    pub fn sync_input(&mut self, text: String, events: &mut Vec<SelectEvent>) -> bool {
        if self.text_owner != ValueOwnership::External || self.text == text {
            return false;
        }
        self.text = text;
        self.settle_search(events);
        true
    }

    fn settle_search(&mut self, events: &mut Vec<SelectEvent>) {
        if self.text != self.last_notified {
            return;
        }
        if let Some(reason) = self.last_reason
            && reason.triggers_search()
        {
            events.push(SelectEvent::Search {
                text: self.text.clone(),
                reason,
            });
        }
    }

    // -------------------------------------------------------------------------
    // Highlight
    // -------------------------------------------------------------------------

    pub fn set_active(&mut self, value: Option<Value>) {
        self.active = value;
    }

    /// Arrow-key navigation. Enters keyboard mode.
    pub fn move_active(&mut self, direction: Direction, index: &OptionIndex) -> Option<&Value> {
        self.keyboard_nav = true;
        self.active = index.next_navigable(self.active.as_ref(), direction).cloned();
        if let Some(info) = self.active.as_ref().and_then(|v| index.get(v)) {
            self.schedule(DeferredTask::ScrollIntoView(info.key.clone()));
        }
        self.active.as_ref()
    }

    /// Mouse entered an option. Ignored in keyboard mode.
    pub fn hover(&mut self, value: Value) -> bool {
        if self.keyboard_nav {
            return false;
        }
        self.active = Some(value);
        true
    }

    /// Mouse left an option. Ignored in keyboard mode.
    pub fn hover_leave(&mut self) -> bool {
        if self.keyboard_nav {
            return false;
        }
        self.active = None;
        true
    }

    /// Mouse moved over the list; leaves keyboard mode.
    pub fn mouse_moved(&mut self) {
        self.keyboard_nav = false;
    }

    /// Highlight the first selected value if the filter shows it, otherwise
    /// the first navigable option.
    pub fn reset_active(&mut self, current: &SelectValue, index: &OptionIndex) {
        self.active = current
            .first()
            .filter(|v| index.values().contains(v))
            .or_else(|| index.first_navigable())
            .cloned();
    }

    /// Keep the highlight on a visible option after the index changed.
    pub fn refresh_active(&mut self, index: &OptionIndex) {
        let visible = self
            .active
            .as_ref()
            .is_some_and(|v| index.values().contains(v));
        if !visible {
            self.active = index.first_navigable().cloned();
        }
    }

    // -------------------------------------------------------------------------
    // Deferred tasks
    // -------------------------------------------------------------------------

    /// Queue `task` under the current generation.
    pub fn schedule(&self, task: DeferredTask) {
        self.deferred.schedule(self.generation, task);
    }

    /// Take everything queued.
    pub fn take_deferred(&mut self) -> Vec<Scheduled> {
        self.deferred.drain()
    }

    /// True if `scheduled` still applies to the current list.
    pub fn is_current(&self, scheduled: &Scheduled) -> bool {
        scheduled.generation == self.generation && self.is_open()
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }
}
