//! Select widget state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::{SelectConfig, SelectMode};
use crate::deferred::{DeferredTask, ScrollTarget};
use crate::error::SelectError;
use crate::events::{InputChangeReason, SelectEvent, SelectHandlers};
use crate::filter::FilterOption;
use crate::index::{IndexCache, IndexInput, OptionIndex};
use crate::option::{OptionDecl, OptionInfo, OptionOrigin};
use crate::store::{DisplayText, ValueOwnership, ValueStore};
use crate::value::{ChangePayload, SelectValue, Value};
use crate::visibility::{Coordinator, Visibility};

/// Unique identifier for a Select widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectId(usize);

impl SelectId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SelectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__select_{}", self.0)
    }
}

/// Internal state for a Select widget.
#[derive(Debug)]
pub(super) struct SelectInner {
    pub config: SelectConfig,
    /// Option declarations, replaced wholesale by `set_options`.
    pub decls: Vec<OptionDecl>,
    /// Bumped whenever `decls` or the filter predicate is replaced.
    pub version: u64,
    pub cache: IndexCache,
    /// Tags the user created (tags mode).
    pub created: Vec<Value>,
    pub store: ValueStore,
    pub coord: Coordinator,
}

impl SelectInner {
    /// The option index for the current declarations and search text.
    pub fn index(&mut self) -> Arc<OptionIndex> {
        let creating = if self.config.mode == SelectMode::Tags {
            self.coord.text()
        } else {
            ""
        };
        let input = IndexInput {
            search: self.coord.text(),
            filter: &self.config.filter_option,
            created: &self.created,
            creating,
        };
        self.cache.get_or_build(self.version, &self.decls, &input)
    }

    /// Commit `next` and queue the change notification.
    pub fn commit(&mut self, next: SelectValue, events: &mut Vec<SelectEvent>) {
        let index = self.index();
        let committed = self.store.commit(next);
        log::debug!("Select commit value={:?} ownership={:?}", committed, self.store.ownership());
        let (value, options) = self
            .store
            .payload(&committed, &index, self.config.label_in_value);
        events.push(SelectEvent::Change { value, options });
    }

    /// Open or close the list, running the entry actions of the new state.
    pub fn set_visible(&mut self, visibility: Visibility, events: &mut Vec<SelectEvent>) -> bool {
        if !self.coord.try_update_visible(visibility, events) {
            return false;
        }
        if visibility.is_open() {
            let index = self.index();
            self.coord.on_opened(self.store.current(), &index);
        } else {
            self.coord.on_closed(events);
        }
        true
    }

    /// Change the search text and keep the highlight on a visible option.
    ///
    /// Typing moves the highlight back to its default, so in tags mode the
    /// tag being typed is highlighted.
    pub fn update_input(
        &mut self,
        text: String,
        reason: InputChangeReason,
        events: &mut Vec<SelectEvent>,
    ) -> bool {
        if !self.coord.try_update_input(text, reason, events) {
            return false;
        }
        if self.coord.is_open() {
            let index = self.index();
            if reason == InputChangeReason::Manual {
                self.coord.reset_active(self.store.current(), &index);
            } else {
                self.coord.refresh_active(&index);
            }
        }
        true
    }

    pub fn check(
        &mut self,
        value: &Value,
        events: &mut Vec<SelectEvent>,
    ) -> Result<bool, SelectError> {
        let index = self.index();
        let Some(next) = self.store.checked(value, &index)? else {
            return Ok(false);
        };
        if self.store.is_user_created(value, &index) && !self.created.contains(value) {
            self.created.push(value.clone());
        }
        self.commit(next, events);
        Ok(true)
    }

    pub fn uncheck(
        &mut self,
        value: &Value,
        events: &mut Vec<SelectEvent>,
    ) -> Result<bool, SelectError> {
        let Some(next) = self.store.unchecked(value)? else {
            return Ok(false);
        };
        let index = self.index();
        let option = self.store.resolve(value, &index);
        self.commit(next, events);
        let removed = SelectValue::Single(Some(value.clone()));
        let (payload, _) = self
            .store
            .payload(&removed, &index, self.config.label_in_value);
        events.push(SelectEvent::Deselect {
            value: payload,
            option,
        });
        Ok(true)
    }
}

/// A headless select with reactive state.
///
/// `Select` owns the selection (unless controlled), the search text, the
/// open/closed state and the highlight. It renders nothing: the host reads
/// its state to draw, forwards input through the dispatch methods in
/// [`events`](super::events), and calls [`run_deferred`](Self::run_deferred)
/// after each paint.
///
/// Cloning gives another handle to the same widget.
///
/// # Example
///
/// ```ignore
/// let fruit = Select::with_options(
///     SelectConfig::new().mode(SelectMode::Multiple),
///     options([("apple", "Apple"), ("pear", "Pear")]),
/// )
/// .handlers(SelectHandlers::new().on_change(|value, _| println!("{:?}", value)));
///
/// fruit.open();
/// fruit.click_option("apple");
/// fruit.run_deferred();
/// ```
pub struct Select {
    /// Unique identifier for this select instance
    id: SelectId,
    /// Internal state
    pub(super) inner: Arc<RwLock<SelectInner>>,
    /// Dirty flag for re-render
    pub(super) dirty: Arc<AtomicBool>,
    /// Notification handlers
    pub(super) handlers: Arc<SelectHandlers>,
    /// Host scroll hook for deferred scroll-into-view
    pub(super) scroll_target: Option<Arc<dyn ScrollTarget>>,
}

impl Select {
    /// Create a select with no options.
    pub fn new(config: SelectConfig) -> Self {
        Self::with_options(config, Vec::new())
    }

    /// Create a select with initial option declarations.
    pub fn with_options(config: SelectConfig, decls: Vec<OptionDecl>) -> Self {
        let store = ValueStore::new(&config);
        let coord = Coordinator::new(config.input_value.clone());
        Self {
            id: SelectId::new(),
            inner: Arc::new(RwLock::new(SelectInner {
                config,
                decls,
                version: 0,
                cache: IndexCache::new(),
                created: Vec::new(),
                store,
                coord,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            handlers: Arc::new(SelectHandlers::default()),
            scroll_target: None,
        }
    }

    /// Attach notification handlers.
    pub fn handlers(mut self, handlers: SelectHandlers) -> Self {
        self.handlers = Arc::new(handlers);
        self
    }

    /// Attach the host's scroll hook.
    pub fn scroll_target(mut self, target: impl ScrollTarget + 'static) -> Self {
        self.scroll_target = Some(Arc::new(target));
        self
    }

    /// Get the unique ID for this select.
    pub fn id(&self) -> SelectId {
        self.id
    }

    /// Get the ID as a string (for node binding).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    // -------------------------------------------------------------------------
    // Locking and dispatch
    // -------------------------------------------------------------------------

    /// Run `f` under the write lock, then dispatch what it emitted.
    ///
    /// Returns `None` if the lock is poisoned.
    pub(super) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut SelectInner, &mut Vec<SelectEvent>) -> R,
    ) -> Option<R> {
        let mut events = Vec::new();
        let result = {
            let mut guard = self.inner.write().ok()?;
            f(&mut *guard, &mut events)
        };
        self.emit(events);
        Some(result)
    }

    fn emit(&self, events: Vec<SelectEvent>) {
        if events.is_empty() {
            return;
        }
        self.dirty.store(true, Ordering::SeqCst);
        for event in &events {
            self.handlers.dispatch(event);
        }
    }

    fn read<R: Default>(&self, f: impl FnOnce(&SelectInner) -> R) -> R {
        self.inner.read().map(|guard| f(&*guard)).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Options
    // -------------------------------------------------------------------------

    /// Replace the option declarations.
    pub fn set_options(&self, decls: Vec<OptionDecl>) {
        self.mutate(|inner, _| {
            inner.decls = decls;
            inner.version += 1;
            let index = inner.index();
            if inner.coord.is_open() {
                inner.coord.refresh_active(&index);
            }
        });
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Replace the option filter.
    pub fn set_filter(&self, filter: FilterOption) {
        self.mutate(|inner, _| {
            inner.config.filter_option = filter;
            inner.version += 1;
        });
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// The option index for the current declarations and search text.
    pub fn index(&self) -> Arc<OptionIndex> {
        self.mutate(|inner, _| inner.index()).unwrap_or_default()
    }

    /// Resolved metadata for `value`, including values seen earlier that
    /// are no longer declared.
    pub fn option_info(&self, value: &Value) -> Option<OptionInfo> {
        self.mutate(|inner, _| {
            let index = inner.index();
            inner.store.lookup(value, &index).cloned()
        })
        .flatten()
    }

    /// How many times the option index has been rebuilt.
    pub fn index_builds(&self) -> usize {
        self.read(|inner| inner.cache.build_count())
    }

    /// Tags the user has created so far.
    pub fn created_tags(&self) -> Vec<Value> {
        self.read(|inner| inner.created.clone())
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    /// The current selection.
    pub fn value(&self) -> SelectValue {
        self.read(|inner| inner.store.current().clone())
    }

    /// The current selection shaped as it would be emitted.
    pub fn payload(&self) -> ChangePayload {
        self.mutate(|inner, _| {
            let index = inner.index();
            let current = inner.store.current().clone();
            inner
                .store
                .payload(&current, &index, inner.config.label_in_value)
                .0
        })
        .unwrap_or(ChangePayload::Raw(SelectValue::default()))
    }

    /// Whether the host owns the value.
    pub fn ownership(&self) -> ValueOwnership {
        self.read(|inner| inner.store.ownership())
    }

    /// Push the controlled value. Ignored unless the select was built with
    /// `SelectConfig::value`.
    pub fn sync_value(&self, value: impl Into<SelectValue>) {
        let value = value.into();
        let changed = self
            .mutate(|inner, _| inner.store.sync_external(value))
            .unwrap_or(false);
        if changed {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Replace the value as if the user picked it.
    pub fn set_value(&self, value: impl Into<SelectValue>) {
        let value = value.into();
        self.mutate(|inner, events| inner.commit(value, events));
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectMode {
        self.read(|inner| inner.config.mode)
    }

    /// Switch modes. The value is reshaped silently: no change event fires.
    pub fn set_mode(&self, mode: SelectMode) {
        let changed = self
            .mutate(|inner, _| {
                inner.config.mode = mode;
                inner.store.set_mode(mode)
            })
            .unwrap_or(false);
        if changed {
            log::debug!("Select {} mode={:?}", self.id, mode);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Add `value` to a multiple selection.
    ///
    /// Returns `Ok(false)` if it was already selected.
    pub fn check_option(&self, value: impl Into<Value>) -> Result<bool, SelectError> {
        let value = value.into();
        self.guard_enabled()?;
        self.mutate(|inner, events| inner.check(&value, events))
            .unwrap_or(Ok(false))
    }

    /// Remove `value` from a multiple selection, emitting `Deselect`.
    ///
    /// Returns `Ok(false)` if it wasn't selected.
    pub fn uncheck_option(&self, value: impl Into<Value>) -> Result<bool, SelectError> {
        let value = value.into();
        self.guard_enabled()?;
        self.mutate(|inner, events| inner.uncheck(&value, events))
            .unwrap_or(Ok(false))
    }

    /// Remove the selected value at `position` (tag close button).
    pub fn remove_checked_at(&self, position: usize) -> Result<bool, SelectError> {
        self.guard_enabled()?;
        self.mutate(|inner, events| {
            let current = inner.store.current();
            let len = current.as_slice().len();
            let value = current
                .as_slice()
                .get(position)
                .cloned()
                .ok_or(SelectError::IndexOutOfRange { index: position, len })?;
            inner.uncheck(&value, events)
        })
        .unwrap_or(Ok(false))
    }

    /// Trigger text for each selected value.
    pub fn display_items(&self) -> Vec<DisplayText> {
        self.mutate(|inner, _| {
            let index = inner.index();
            inner
                .store
                .current()
                .as_slice()
                .iter()
                .map(|v| inner.store.display(v, &index))
                .collect()
        })
        .unwrap_or_default()
    }

    /// Trigger text when nothing is selected.
    pub fn placeholder(&self) -> Option<String> {
        self.read(|inner| inner.config.placeholder.clone())
    }

    // -------------------------------------------------------------------------
    // Search text
    // -------------------------------------------------------------------------

    /// The search text shown in the input box.
    pub fn input_text(&self) -> String {
        self.read(|inner| inner.coord.text().to_string())
    }

    /// Push the controlled search text. Ignored unless the select was built
    /// with `SelectConfig::input_value`.
    pub fn sync_input_value(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|inner, events| {
            if inner.coord.sync_input(text, events) && inner.coord.is_open() {
                let index = inner.index();
                inner.coord.refresh_active(&index);
            }
        });
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Check if the option list is open.
    pub fn is_open(&self) -> bool {
        self.read(|inner| inner.coord.is_open())
    }

    /// Open the option list.
    pub fn open(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.mutate(|inner, events| inner.set_visible(Visibility::Open, events))
            .unwrap_or(false)
    }

    /// Close the option list.
    pub fn close(&self) -> bool {
        self.mutate(|inner, events| inner.set_visible(Visibility::Closed, events))
            .unwrap_or(false)
    }

    /// Toggle the option list open/closed.
    pub fn toggle(&self) -> bool {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// The highlighted option.
    pub fn active_value(&self) -> Option<Value> {
        self.read(|inner| inner.coord.active().cloned())
    }

    /// Current visibility generation.
    pub fn generation(&self) -> u64 {
        self.read(|inner| inner.coord.generation())
    }

    /// Run deferred tasks whose generation is still current.
    ///
    /// Call after the host's paint/settle pass. Returns how many ran.
    pub fn run_deferred(&self) -> usize {
        let Some(tasks) = self.mutate(|inner, _| inner.coord.take_deferred()) else {
            return 0;
        };
        let mut ran = 0;
        for scheduled in tasks {
            let current = self.read(|inner| inner.coord.is_current(&scheduled));
            if !current {
                log::trace!(
                    "Select {} dropped stale {:?} (generation {})",
                    self.id,
                    scheduled.task,
                    scheduled.generation
                );
                continue;
            }
            match scheduled.task {
                DeferredTask::ScrollIntoView(key) => {
                    if let Some(target) = &self.scroll_target {
                        target.scroll_to(&key);
                    }
                }
                DeferredTask::ClosePopup => {
                    self.close();
                }
            }
            ran += 1;
        }
        ran
    }

    /// True if deferred tasks are waiting.
    pub fn has_deferred(&self) -> bool {
        self.read(|inner| inner.coord.has_deferred())
    }

    // -------------------------------------------------------------------------
    // Misc
    // -------------------------------------------------------------------------

    /// Whether the whole widget ignores input.
    pub fn is_disabled(&self) -> bool {
        self.read(|inner| inner.config.disabled)
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.mutate(|inner, _| inner.config.disabled = disabled);
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(super) fn guard_enabled(&self) -> Result<(), SelectError> {
        if self.is_disabled() {
            Err(SelectError::Disabled)
        } else {
            Ok(())
        }
    }

    /// Origin of an indexed value.
    pub fn origin(&self, value: &Value) -> Option<OptionOrigin> {
        self.option_info(value).map(|info| info.origin)
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the select state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .field("dirty", &self.dirty)
            .field("handlers", &self.handlers)
            .field("scroll_target", &self.scroll_target.is_some())
            .finish()
    }
}

impl Clone for Select {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            handlers: Arc::clone(&self.handlers),
            scroll_target: self.scroll_target.clone(),
        }
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new(SelectConfig::default())
    }
}
